// ⚙️ Configuration - Sources and analysis defaults as data
// Loaded from a JSON file; every field has a default.

use crate::aggregate::Metric;
use crate::error::ConfigError;
use crate::provider::{LocationProvider, SourceLocation};
use crate::reconciliation::AmbiguityPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_DRAFT_URL: &str = "https://www.basketball-reference.com/draft/NBA_2024.html";
pub const DEFAULT_SEASON_URL: &str = "https://www.basketball-reference.com/leagues/NBA_2025_per_game.html";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub draft_source: SourceLocation,
    pub season_source: SourceLocation,
    /// Header levels at the top of CSV sources
    pub csv_header_rows: usize,
    pub ambiguity_policy: AmbiguityPolicy,
    /// Starting value of the minutes filter, on the season table's `MP`
    /// scale (minutes per game for the default per-game page)
    pub min_minutes: f64,
    /// Minutes filter increment in the dashboard
    pub minutes_step: f64,
    /// "Top picks" cutoff (inclusive)
    pub top_pick_max: u32,
    /// First pick counted as a late pick (inclusive)
    pub late_pick_min: u32,
    /// Rows in ranked lists
    pub limit: usize,
    pub metric: Metric,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            draft_source: SourceLocation::Url(DEFAULT_DRAFT_URL.to_string()),
            season_source: SourceLocation::Url(DEFAULT_SEASON_URL.to_string()),
            csv_header_rows: 1,
            ambiguity_policy: AmbiguityPolicy::FirstMatch,
            min_minutes: 10.0,
            minutes_step: 5.0,
            top_pick_max: 10,
            late_pick_min: 15,
            limit: 5,
            metric: Metric::Points,
        }
    }
}

impl AnalysisConfig {
    /// Load config from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })?;

        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Provider reading the configured sources
    pub fn provider(&self) -> LocationProvider {
        LocationProvider::new(self.draft_source.clone(), self.season_source.clone())
            .with_csv_header_rows(self.csv_header_rows)
    }
}

// ============================================================================
// TESTS
// ============================================================================
