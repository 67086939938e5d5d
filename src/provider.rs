// 🌐 Source Data Providers
// Where the raw draft and season tables come from: local CSV/HTML files,
// live pages (feature `fetch`), or in-memory tables.

use crate::error::FetchError;
use crate::table::RawTable;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Identifies one of the two source tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKey {
    Draft,
    Season,
}

impl SourceKey {
    pub fn name(&self) -> &'static str {
        match self {
            SourceKey::Draft => "draft",
            SourceKey::Season => "season",
        }
    }
}

/// Where a table lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceLocation {
    /// CSV file, or an HTML page saved to disk (`.html` / `.htm`)
    File(PathBuf),
    /// Live HTML page; needs the `fetch` feature
    Url(String),
}

/// SourceDataProvider - Supplies the two raw tables
pub trait SourceDataProvider {
    fn fetch_draft_table(&self) -> Result<RawTable, FetchError>;

    fn fetch_season_table(&self) -> Result<RawTable, FetchError>;

    fn fetch(&self, key: SourceKey) -> Result<RawTable, FetchError> {
        match key {
            SourceKey::Draft => self.fetch_draft_table(),
            SourceKey::Season => self.fetch_season_table(),
        }
    }
}

// ============================================================================
// LOCATION PROVIDER (files + URLs)
// ============================================================================

pub struct LocationProvider {
    draft: SourceLocation,
    season: SourceLocation,
    /// Header levels at the top of CSV files
    csv_header_rows: usize,
}

impl LocationProvider {
    pub fn new(draft: SourceLocation, season: SourceLocation) -> Self {
        LocationProvider {
            draft,
            season,
            csv_header_rows: 1,
        }
    }

    pub fn with_csv_header_rows(mut self, rows: usize) -> Self {
        self.csv_header_rows = rows;
        self
    }

    fn load(&self, location: &SourceLocation) -> Result<RawTable, FetchError> {
        match location {
            SourceLocation::File(path) => load_file(path, self.csv_header_rows),
            SourceLocation::Url(url) => load_url(url),
        }
    }
}

impl SourceDataProvider for LocationProvider {
    fn fetch_draft_table(&self) -> Result<RawTable, FetchError> {
        self.load(&self.draft)
    }

    fn fetch_season_table(&self) -> Result<RawTable, FetchError> {
        self.load(&self.season)
    }
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
        .unwrap_or(false)
}

fn load_file(path: &Path, csv_header_rows: usize) -> Result<RawTable, FetchError> {
    debug!(path = %path.display(), "loading source file");

    if is_html(path) {
        let html = fs::read_to_string(path).map_err(|source| FetchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        return RawTable::from_html(&html)
            .ok_or_else(|| FetchError::NoTable(path.display().to_string()));
    }

    RawTable::from_csv_path(path, csv_header_rows)
}

#[cfg(feature = "fetch")]
fn load_url(url: &str) -> Result<RawTable, FetchError> {
    http::fetch_table(url)
}

#[cfg(not(feature = "fetch"))]
fn load_url(url: &str) -> Result<RawTable, FetchError> {
    Err(FetchError::Http(format!(
        "{}: built without the `fetch` feature",
        url
    )))
}

#[cfg(feature = "fetch")]
mod http {
    use super::*;
    use std::time::Duration;

    const USER_AGENT: &str = concat!("draft-insight/", env!("CARGO_PKG_VERSION"));
    const TIMEOUT_SECS: u64 = 30;

    /// GET `url` and extract its first HTML table
    pub(super) fn fetch_table(url: &str) -> Result<RawTable, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        debug!(url, "fetching source page");
        let response = client
            .get(url)
            .send()
            .map_err(|e| FetchError::Http(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .map_err(|e| FetchError::Http(format!("{}: {}", url, e)))?;

        RawTable::from_html(&body).ok_or_else(|| FetchError::NoTable(url.to_string()))
    }
}

// ============================================================================
// STATIC PROVIDER
// ============================================================================

/// Serves tables already in memory (embedding, tests)
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    pub draft: RawTable,
    pub season: RawTable,
}

impl StaticProvider {
    pub fn new(draft: RawTable, season: RawTable) -> Self {
        StaticProvider { draft, season }
    }
}

impl SourceDataProvider for StaticProvider {
    fn fetch_draft_table(&self) -> Result<RawTable, FetchError> {
        Ok(self.draft.clone())
    }

    fn fetch_season_table(&self) -> Result<RawTable, FetchError> {
        Ok(self.season.clone())
    }
}

// ============================================================================
// TESTS
// ============================================================================
