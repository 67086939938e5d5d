// ⚖️ Reconciliation Engine - Join draft order to season performance
//
// Inner join on identity key:
//   DraftRecord ⋈ SeasonStatRecord → MergedRecord
//
// One merged record per drafted player at most. Drafted players without a
// season line simply drop out; duplicate season keys are resolved by policy
// and always reported.

use crate::parser::{DraftRecord, SeasonStatRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

// ============================================================================
// MERGED RECORD
// ============================================================================

/// MergedRecord - A drafted player matched to exactly one season line
///
/// `pick` and `drafted_team` come from the draft table, never from the
/// player's current roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    pub pick: u32,
    pub player_name: String,
    pub drafted_team: String,
    pub identity_key: String,
    pub points: f64,
    pub field_goal_pct: Option<f64>,
    pub three_point_pct: Option<f64>,
    pub rebounds: Option<f64>,
    pub assists: Option<f64>,
    pub steals: Option<f64>,
    pub blocks: Option<f64>,
    pub minutes: Option<f64>,
    pub true_shooting_pct: Option<f64>,
    pub composite_score: f64,
}

impl MergedRecord {
    pub fn from_parts(draft: &DraftRecord, season: &SeasonStatRecord) -> Self {
        MergedRecord {
            pick: draft.pick,
            player_name: draft.player_name.clone(),
            drafted_team: draft.drafted_team.clone(),
            identity_key: draft.identity_key.clone(),
            points: season.points,
            field_goal_pct: season.field_goal_pct,
            three_point_pct: season.three_point_pct,
            rebounds: season.rebounds,
            assists: season.assists,
            steals: season.steals,
            blocks: season.blocks,
            minutes: season.minutes,
            true_shooting_pct: season.true_shooting_pct,
            composite_score: season.composite_score,
        }
    }
}

// ============================================================================
// AMBIGUITY
// ============================================================================

/// What to do when several season lines share a draft record's key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    /// First season line in table order wins
    #[default]
    FirstMatch,
    /// Draft record is excluded as unresolved
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbiguousMatch {
    pub draft: DraftRecord,
    /// Season-table spellings of every candidate, in table order
    pub candidates: Vec<String>,
    /// True when the first candidate was merged (FirstMatch)
    pub resolved: bool,
}

// ============================================================================
// RECONCILIATION REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub merged: Vec<MergedRecord>,
    pub unmatched_drafts: Vec<DraftRecord>,
    pub ambiguous: Vec<AmbiguousMatch>,
    pub policy: AmbiguityPolicy,
    pub draft_count: usize,
    pub season_count: usize,
    pub reconciled_at: DateTime<Utc>,
}

impl ReconciliationReport {
    /// No draft record found a season line (a displayable state, not a failure)
    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }

    pub fn has_ambiguity(&self) -> bool {
        !self.ambiguous.is_empty()
    }

    /// Share of drafted players that were merged (0.0 for an empty draft)
    pub fn match_rate(&self) -> f64 {
        if self.draft_count == 0 {
            0.0
        } else {
            self.merged.len() as f64 / self.draft_count as f64
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Reconciled {} drafted players against {} season lines: {} merged ({:.1}%), {} without season stats, {} ambiguous",
            self.draft_count,
            self.season_count,
            self.merged.len(),
            self.match_rate() * 100.0,
            self.unmatched_drafts.len(),
            self.ambiguous.len()
        )
    }
}

// ============================================================================
// RECONCILER
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    pub policy: AmbiguityPolicy,
}

impl Reconciler {
    pub fn new() -> Self {
        Reconciler::default()
    }

    pub fn with_policy(policy: AmbiguityPolicy) -> Self {
        Reconciler { policy }
    }

    /// Inner join; merged records come out in draft order
    pub fn join(&self, drafts: &[DraftRecord], seasons: &[SeasonStatRecord]) -> Vec<MergedRecord> {
        self.reconcile(drafts, seasons).merged
    }

    /// Join and account for every draft record that did not merge cleanly
    ///
    /// ```
    /// use draft_insight::{DraftRecord, Reconciler, SeasonStatRecord, StatLine};
    ///
    /// let drafts = vec![DraftRecord::new(1, "A", "ATL"), DraftRecord::new(2, "B", "WAS")];
    /// let seasons = vec![SeasonStatRecord::new("A", StatLine::points(30.0))];
    ///
    /// let report = Reconciler::new().reconcile(&drafts, &seasons);
    /// assert_eq!(report.merged.len(), 1);
    /// assert_eq!(report.merged[0].pick, 1);
    /// assert_eq!(report.unmatched_drafts[0].player_name, "B");
    /// ```
    pub fn reconcile(&self, drafts: &[DraftRecord], seasons: &[SeasonStatRecord]) -> ReconciliationReport {
        let index = Self::index_seasons(seasons);

        let mut merged = Vec::new();
        let mut unmatched_drafts = Vec::new();
        let mut ambiguous = Vec::new();

        for draft in drafts {
            let candidates = match index.get(draft.identity_key.as_str()) {
                Some(candidates) => candidates,
                None => {
                    unmatched_drafts.push(draft.clone());
                    continue;
                }
            };

            if candidates.len() > 1 {
                let resolved = self.policy == AmbiguityPolicy::FirstMatch;
                warn!(
                    player = %draft.player_name,
                    pick = draft.pick,
                    candidates = candidates.len(),
                    resolved,
                    "ambiguous season match"
                );
                ambiguous.push(AmbiguousMatch {
                    draft: draft.clone(),
                    candidates: candidates.iter().map(|s| s.player_name.clone()).collect(),
                    resolved,
                });
                if !resolved {
                    continue;
                }
            }

            merged.push(MergedRecord::from_parts(draft, candidates[0]));
        }

        let report = ReconciliationReport {
            merged,
            unmatched_drafts,
            ambiguous,
            policy: self.policy,
            draft_count: drafts.len(),
            season_count: seasons.len(),
            reconciled_at: Utc::now(),
        };

        info!("{}", report.summary());
        report
    }

    /// Season records grouped by identity key, table order kept per key
    fn index_seasons(seasons: &[SeasonStatRecord]) -> HashMap<&str, Vec<&SeasonStatRecord>> {
        let mut index: HashMap<&str, Vec<&SeasonStatRecord>> = HashMap::new();
        for season in seasons {
            index
                .entry(season.identity_key.as_str())
                .or_default()
                .push(season);
        }
        index
    }
}

// ============================================================================
// TESTS
// ============================================================================
