// 🔎 Filter Engine - Minutes threshold + name search
// Predicates compose conjunctively; an empty result is a normal outcome.

use crate::reconciliation::MergedRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Inclusive lower bound on minutes
    pub min_minutes: f64,
    /// Case-insensitive substring of the player name
    pub search: Option<String>,
}

impl FilterCriteria {
    pub fn new(min_minutes: f64) -> Self {
        FilterCriteria {
            min_minutes,
            search: None,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Lowercased search needle, `None` when blank
    fn needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

impl Default for FilterCriteria {
    fn default() -> Self {
        FilterCriteria::new(0.0)
    }
}

/// Filtered view, with "nothing matched" kept distinct from any failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "records", rename_all = "snake_case")]
pub enum FilterOutcome {
    Matches(Vec<MergedRecord>),
    NoMatch,
}

impl FilterOutcome {
    pub fn records(&self) -> &[MergedRecord] {
        match self {
            FilterOutcome::Matches(records) => records,
            FilterOutcome::NoMatch => &[],
        }
    }

    pub fn is_no_match(&self) -> bool {
        matches!(self, FilterOutcome::NoMatch)
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

pub struct FilterEngine;

impl FilterEngine {
    /// Keep records passing both predicates, in input order
    ///
    /// Records with unknown minutes never pass the minutes predicate.
    pub fn filter(records: &[MergedRecord], criteria: &FilterCriteria) -> Vec<MergedRecord> {
        let needle = criteria.needle();

        records
            .iter()
            .filter(|r| r.minutes.map_or(false, |m| m >= criteria.min_minutes))
            .filter(|r| match &needle {
                Some(needle) => r.player_name.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .cloned()
            .collect()
    }

    pub fn apply(records: &[MergedRecord], criteria: &FilterCriteria) -> FilterOutcome {
        let filtered = Self::filter(records, criteria);
        if filtered.is_empty() {
            FilterOutcome::NoMatch
        } else {
            FilterOutcome::Matches(filtered)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{DraftRecord, SeasonStatRecord, StatLine};

    fn record(pick: u32, name: &str, minutes: Option<f64>) -> MergedRecord {
        MergedRecord::from_parts(
            &DraftRecord::new(pick, name, "ATL"),
            &SeasonStatRecord::new(
                name,
                StatLine {
                    points: 10.0,
                    minutes,
                    ..StatLine::default()
                },
            ),
        )
    }

    fn sample() -> Vec<MergedRecord> {
        vec![
            record(1, "Zaccharie Risacher", Some(1500.0)),
            record(2, "Alex Sarr", Some(100.0)),
            record(3, "Reed Sheppard", Some(99.9)),
            record(4, "Stephon Castle", None),
        ]
    }

    #[test]
    fn test_minutes_boundary_is_inclusive() {
        let kept = FilterEngine::filter(&sample(), &FilterCriteria::new(100.0));
        let names: Vec<&str> = kept.iter().map(|r| r.player_name.as_str()).collect();

        assert_eq!(names, vec!["Zaccharie Risacher", "Alex Sarr"]);
    }

    #[test]
    fn test_unknown_minutes_never_pass() {
        let kept = FilterEngine::filter(&sample(), &FilterCriteria::new(0.0));
        assert_eq!(kept.len(), 3);
        assert!(kept.iter().all(|r| r.player_name != "Stephon Castle"));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let criteria = FilterCriteria::new(0.0).with_search("  SARR ");
        let kept = FilterEngine::filter(&sample(), &criteria);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].pick, 2);

        // Regex metacharacters are plain text
        let criteria = FilterCriteria::new(0.0).with_search("S.*r");
        assert!(FilterEngine::filter(&sample(), &criteria).is_empty());
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let criteria = FilterCriteria::new(0.0).with_search("   ");
        assert_eq!(FilterEngine::filter(&sample(), &criteria).len(), 3);
    }

    #[test]
    fn test_predicates_compose() {
        let criteria = FilterCriteria::new(100.0).with_search("e");
        let kept = FilterEngine::filter(&sample(), &criteria);
        let picks: Vec<u32> = kept.iter().map(|r| r.pick).collect();

        // "Reed Sheppard" matches the search but not the minutes floor
        assert_eq!(picks, vec![1, 2]);
    }

    #[test]
    fn test_no_match_is_distinguishable() {
        let criteria = FilterCriteria::new(0.0).with_search("Wembanyama");
        let outcome = FilterEngine::apply(&sample(), &criteria);

        assert!(outcome.is_no_match());
        assert!(outcome.is_empty());
        assert_eq!(outcome.records(), &[] as &[MergedRecord]);

        let outcome = FilterEngine::apply(&sample(), &FilterCriteria::new(0.0));
        assert!(!outcome.is_no_match());
        assert_eq!(outcome.len(), 3);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let records = sample();
        let before = records.clone();
        let _ = FilterEngine::filter(&records, &FilterCriteria::new(1000.0));
        assert_eq!(records, before);
    }
}
