// 📊 Aggregator - Correlations, rankings and team summaries
//
// Every function is pure over a filtered slice: inputs are never mutated and
// results do not depend on input order (records are put in canonical order
// before anything order-sensitive happens).

use crate::identity::same_identity;
use crate::reconciliation::MergedRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// METRICS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "PTS")]
    Points,
    #[serde(rename = "FG%")]
    FieldGoalPct,
    #[serde(rename = "3P%")]
    ThreePointPct,
    #[serde(rename = "TRB")]
    Rebounds,
    #[serde(rename = "AST")]
    Assists,
    #[serde(rename = "STL")]
    Steals,
    #[serde(rename = "BLK")]
    Blocks,
    #[serde(rename = "MP")]
    Minutes,
    #[serde(rename = "Composite")]
    Composite,
    #[serde(rename = "TS%")]
    TrueShooting,
}

impl Metric {
    pub const ALL: [Metric; 10] = [
        Metric::Points,
        Metric::FieldGoalPct,
        Metric::ThreePointPct,
        Metric::Rebounds,
        Metric::Assists,
        Metric::Steals,
        Metric::Blocks,
        Metric::Minutes,
        Metric::Composite,
        Metric::TrueShooting,
    ];

    /// Column label as shown in box scores
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Points => "PTS",
            Metric::FieldGoalPct => "FG%",
            Metric::ThreePointPct => "3P%",
            Metric::Rebounds => "TRB",
            Metric::Assists => "AST",
            Metric::Steals => "STL",
            Metric::Blocks => "BLK",
            Metric::Minutes => "MP",
            Metric::Composite => "Composite",
            Metric::TrueShooting => "TS%",
        }
    }

    pub fn value(&self, record: &MergedRecord) -> Option<f64> {
        match self {
            Metric::Points => Some(record.points),
            Metric::FieldGoalPct => record.field_goal_pct,
            Metric::ThreePointPct => record.three_point_pct,
            Metric::Rebounds => record.rebounds,
            Metric::Assists => record.assists,
            Metric::Steals => record.steals,
            Metric::Blocks => record.blocks,
            Metric::Minutes => record.minutes,
            Metric::Composite => Some(record.composite_score),
            Metric::TrueShooting => record.true_shooting_pct,
        }
    }

    /// Next metric in selector order (wraps)
    pub fn next(&self) -> Metric {
        let index = Metric::ALL.iter().position(|m| m == self).unwrap_or(0);
        Metric::ALL[(index + 1) % Metric::ALL.len()]
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        let by_label = Metric::ALL
            .iter()
            .find(|m| m.label().eq_ignore_ascii_case(wanted))
            .copied();

        by_label
            .or_else(|| match wanted.to_lowercase().as_str() {
                "points" => Some(Metric::Points),
                "fg" | "field_goal_pct" => Some(Metric::FieldGoalPct),
                "3p" | "three_point_pct" => Some(Metric::ThreePointPct),
                "rebounds" | "reb" => Some(Metric::Rebounds),
                "assists" => Some(Metric::Assists),
                "steals" => Some(Metric::Steals),
                "blocks" => Some(Metric::Blocks),
                "minutes" => Some(Metric::Minutes),
                "composite_score" | "score" => Some(Metric::Composite),
                "ts" | "true_shooting" => Some(Metric::TrueShooting),
                _ => None,
            })
            .ok_or_else(|| format!("unknown metric: {}", s))
    }
}

// ============================================================================
// RESULT TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub team: String,
    pub count: usize,
    pub avg_pick: f64,
    pub total_minutes: f64,
    pub avg_composite: f64,
    pub avg_points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub metric: Metric,
    pub players: usize,
    /// `None` when no record has minutes
    pub avg_minutes: Option<f64>,
    pub correlation: f64,
}

// ============================================================================
// ORDERING HELPERS
// ============================================================================

fn canonical_cmp(a: &MergedRecord, b: &MergedRecord) -> Ordering {
    a.pick
        .cmp(&b.pick)
        .then_with(|| a.player_name.cmp(&b.player_name))
        .then_with(|| a.drafted_team.cmp(&b.drafted_team))
        .then_with(|| a.composite_score.total_cmp(&b.composite_score))
}

/// References sorted by pick, then name
fn canonical(records: &[MergedRecord]) -> Vec<&MergedRecord> {
    let mut sorted: Vec<&MergedRecord> = records.iter().collect();
    sorted.sort_by(|a, b| canonical_cmp(a, b));
    sorted
}

fn ranked_by<'a>(
    candidates: impl Iterator<Item = &'a MergedRecord>,
    metric: Metric,
    descending: bool,
    limit: usize,
) -> Vec<MergedRecord> {
    let mut scored: Vec<(f64, &MergedRecord)> = candidates
        .filter_map(|r| metric.value(r).map(|v| (v, r)))
        .collect();

    scored.sort_by(|(va, a), (vb, b)| {
        let by_value = if descending { vb.total_cmp(va) } else { va.total_cmp(vb) };
        by_value.then_with(|| canonical_cmp(a, b))
    });

    scored
        .into_iter()
        .take(limit)
        .map(|(_, r)| r.clone())
        .collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

// ============================================================================
// AGGREGATES
// ============================================================================

/// Pearson correlation between draft pick and `metric`
///
/// Only records with a known metric value take part. Returns 0.0 when fewer
/// than two such records exist or either side has zero variance.
pub fn correlation(records: &[MergedRecord], metric: Metric) -> f64 {
    let mut pairs: Vec<(f64, f64)> = records
        .iter()
        .filter_map(|r| metric.value(r).map(|v| (r.pick as f64, v)))
        .collect();

    if pairs.len() < 2 {
        return 0.0;
    }

    pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.total_cmp(&b.1)));

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    if variance_x == 0.0 || variance_y == 0.0 {
        return 0.0;
    }

    (covariance / (variance_x.sqrt() * variance_y.sqrt())).clamp(-1.0, 1.0)
}

/// Records with `pick <= max_pick`, ascending by pick
pub fn top_picks(records: &[MergedRecord], max_pick: u32) -> Vec<MergedRecord> {
    canonical(records)
        .into_iter()
        .filter(|r| r.pick <= max_pick)
        .cloned()
        .collect()
}

/// Best performers drafted at `min_pick` or later
pub fn best_late_finds(
    records: &[MergedRecord],
    min_pick: u32,
    metric: Metric,
    limit: usize,
) -> Vec<MergedRecord> {
    ranked_by(
        records.iter().filter(|r| r.pick >= min_pick),
        metric,
        true,
        limit,
    )
}

/// Weakest performers among picks `<= max_pick`, worst first
pub fn underdelivering_early_picks(
    records: &[MergedRecord],
    max_pick: u32,
    metric: Metric,
    limit: usize,
) -> Vec<MergedRecord> {
    ranked_by(
        records.iter().filter(|r| r.pick <= max_pick),
        metric,
        false,
        limit,
    )
}

/// Summary over records drafted by `team`; `None` when the team has none
pub fn team_summary(records: &[MergedRecord], team: &str) -> Option<TeamSummary> {
    let subset: Vec<&MergedRecord> = canonical(records)
        .into_iter()
        .filter(|r| r.drafted_team == team)
        .collect();

    summarize(team, &subset)
}

fn summarize(team: &str, subset: &[&MergedRecord]) -> Option<TeamSummary> {
    if subset.is_empty() {
        return None;
    }

    let picks: Vec<f64> = subset.iter().map(|r| r.pick as f64).collect();
    let composites: Vec<f64> = subset.iter().map(|r| r.composite_score).collect();
    let points: Vec<f64> = subset.iter().map(|r| r.points).collect();

    Some(TeamSummary {
        team: team.to_string(),
        count: subset.len(),
        avg_pick: mean(&picks)?,
        total_minutes: subset.iter().filter_map(|r| r.minutes).sum(),
        avg_composite: mean(&composites)?,
        avg_points: mean(&points)?,
    })
}

/// One summary per drafting team, sorted by team name
pub fn team_summaries(records: &[MergedRecord]) -> Vec<TeamSummary> {
    let mut by_team: BTreeMap<&str, Vec<&MergedRecord>> = BTreeMap::new();
    for record in canonical(records) {
        by_team
            .entry(record.drafted_team.as_str())
            .or_default()
            .push(record);
    }

    by_team
        .into_iter()
        .filter_map(|(team, subset)| summarize(team, &subset))
        .collect()
}

/// Headline numbers for a filtered view
pub fn overview(records: &[MergedRecord], metric: Metric) -> Overview {
    let minutes: Vec<f64> = canonical(records)
        .into_iter()
        .filter_map(|r| r.minutes)
        .collect();

    Overview {
        metric,
        players: records.len(),
        avg_minutes: mean(&minutes),
        correlation: correlation(records, metric),
    }
}

/// Side-by-side lookup by identity (suffix variants match), unknown names skipped
pub fn compare_players(records: &[MergedRecord], names: &[&str]) -> Vec<MergedRecord> {
    let sorted = canonical(records);

    names
        .iter()
        .filter_map(|name| {
            sorted
                .iter()
                .find(|r| same_identity(&r.player_name, name))
                .map(|r| (*r).clone())
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
