// 🗃️ Table Cache - Fetch each source at most once per run
//
// Owned by whoever drives the run; there is no process-wide instance.
// No TTL and no invalidation: drop the cache to start over.

use crate::error::FetchError;
use crate::provider::{SourceDataProvider, SourceKey};
use crate::table::RawTable;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

pub struct TableCache<P> {
    provider: P,
    tables: HashMap<SourceKey, Arc<RawTable>>,
    fetch_count: usize,
}

impl<P: SourceDataProvider> TableCache<P> {
    pub fn new(provider: P) -> Self {
        TableCache {
            provider,
            tables: HashMap::new(),
            fetch_count: 0,
        }
    }

    /// Cached table for `key`, fetching it on first use
    ///
    /// Failed fetches are not cached; the next call tries again.
    pub fn get_or_fetch(&mut self, key: SourceKey) -> Result<Arc<RawTable>, FetchError> {
        if let Some(table) = self.tables.get(&key) {
            debug!(source = key.name(), "table cache hit");
            return Ok(Arc::clone(table));
        }

        info!(source = key.name(), "fetching table");
        let table = Arc::new(self.provider.fetch(key)?);
        self.fetch_count += 1;
        info!(source = key.name(), rows = table.row_count(), "table fetched");

        self.tables.insert(key, Arc::clone(&table));
        Ok(table)
    }

    pub fn is_cached(&self, key: SourceKey) -> bool {
        self.tables.contains_key(&key)
    }

    /// Successful provider fetches so far
    pub fn fetch_count(&self) -> usize {
        self.fetch_count
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Counts calls; fails the first `failures` season fetches
    struct CountingProvider {
        calls: Cell<usize>,
        failures: Cell<usize>,
    }

    impl SourceDataProvider for CountingProvider {
        fn fetch_draft_table(&self) -> Result<RawTable, FetchError> {
            self.calls.set(self.calls.get() + 1);
            Ok(RawTable::from_rows(&["Pk", "Player", "Tm"], &[&["1", "A", "ATL"]]))
        }

        fn fetch_season_table(&self) -> Result<RawTable, FetchError> {
            self.calls.set(self.calls.get() + 1);
            if self.failures.get() > 0 {
                self.failures.set(self.failures.get() - 1);
                return Err(FetchError::Status {
                    url: "season".to_string(),
                    status: 502,
                });
            }
            Ok(RawTable::from_rows(&["Player", "PTS"], &[&["A", "20"]]))
        }
    }

    fn provider(failures: usize) -> CountingProvider {
        CountingProvider {
            calls: Cell::new(0),
            failures: Cell::new(failures),
        }
    }

    #[test]
    fn test_repeated_calls_reuse_the_first_result() {
        let mut cache = TableCache::new(provider(0));

        let first = cache.get_or_fetch(SourceKey::Draft).unwrap();
        let second = cache.get_or_fetch(SourceKey::Draft).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.provider().calls.get(), 1);
        assert_eq!(cache.fetch_count(), 1);
        assert!(cache.is_cached(SourceKey::Draft));
        assert!(!cache.is_cached(SourceKey::Season));
    }

    #[test]
    fn test_keys_are_cached_independently() {
        let mut cache = TableCache::new(provider(0));

        cache.get_or_fetch(SourceKey::Draft).unwrap();
        cache.get_or_fetch(SourceKey::Season).unwrap();
        cache.get_or_fetch(SourceKey::Season).unwrap();

        assert_eq!(cache.provider().calls.get(), 2);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let mut cache = TableCache::new(provider(1));

        assert!(cache.get_or_fetch(SourceKey::Season).is_err());
        assert!(!cache.is_cached(SourceKey::Season));

        let table = cache.get_or_fetch(SourceKey::Season).unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(cache.provider().calls.get(), 2);
        assert_eq!(cache.fetch_count(), 1);
    }
}
