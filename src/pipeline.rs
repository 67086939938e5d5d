// 🔁 Pipeline - fetch → normalize → reconcile, then per-session analysis
//
// A run either produces the merged table or stops at the first fatal cause
// (fetch or parse). Analysis is a pure function of the merged records and
// session-scoped parameters.

use crate::aggregate::{
    best_late_finds, compare_players, overview, team_summaries, team_summary, top_picks,
    underdelivering_early_picks, Metric, Overview, TeamSummary,
};
use crate::cache::TableCache;
use crate::config::AnalysisConfig;
use crate::error::PipelineError;
use crate::filter::{FilterCriteria, FilterEngine, FilterOutcome};
use crate::parser::{DraftTableNormalizer, ParseStats, SeasonTableNormalizer, TableNormalizer};
use crate::provider::{SourceDataProvider, SourceKey};
use crate::reconciliation::{MergedRecord, ReconciliationReport, Reconciler};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span};
use uuid::Uuid;

// ============================================================================
// PIPELINE RUN
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    pub run_id: Uuid,
    pub draft_stats: ParseStats,
    pub season_stats: ParseStats,
    pub report: ReconciliationReport,
}

impl PipelineRun {
    pub fn records(&self) -> &[MergedRecord] {
        &self.report.merged
    }

    /// Nothing reconciled; show "no data", not a failure
    pub fn is_empty(&self) -> bool {
        self.report.is_empty()
    }
}

pub struct Pipeline<P> {
    cache: TableCache<P>,
    reconciler: Reconciler,
    drafts: DraftTableNormalizer,
    seasons: SeasonTableNormalizer,
}

impl<P: SourceDataProvider> Pipeline<P> {
    pub fn new(cache: TableCache<P>, reconciler: Reconciler) -> Self {
        Pipeline {
            cache,
            reconciler,
            drafts: DraftTableNormalizer::new(),
            seasons: SeasonTableNormalizer::new(),
        }
    }

    /// Run every stage; repeated runs reuse the cached source tables
    pub fn run(&mut self) -> Result<PipelineRun, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline", %run_id);
        let _guard = span.enter();

        let draft_table = self.cache.get_or_fetch(SourceKey::Draft)?;
        let season_table = self.cache.get_or_fetch(SourceKey::Season)?;

        let (drafts, draft_stats) = self.drafts.parse_with_stats(&draft_table)?;
        let (seasons, season_stats) = self.seasons.parse_with_stats(&season_table)?;

        let report = self.reconciler.reconcile(&drafts, &seasons);
        info!(merged = report.merged.len(), "pipeline run complete");

        Ok(PipelineRun {
            run_id,
            draft_stats,
            season_stats,
            report,
        })
    }

    pub fn cache(&self) -> &TableCache<P> {
        &self.cache
    }
}

// ============================================================================
// SESSION ANALYSIS
// ============================================================================

/// Parameters owned by one viewing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParams {
    pub min_minutes: f64,
    pub search: Option<String>,
    pub metric: Metric,
    pub team: Option<String>,
    /// Players picked for side-by-side comparison
    #[serde(default)]
    pub compare: Vec<String>,
    pub top_pick_max: u32,
    pub late_pick_min: u32,
    pub limit: usize,
}

impl AnalysisParams {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        AnalysisParams {
            min_minutes: config.min_minutes,
            search: None,
            metric: config.metric,
            team: None,
            compare: Vec::new(),
            top_pick_max: config.top_pick_max,
            late_pick_min: config.late_pick_min,
            limit: config.limit,
        }
    }

    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            min_minutes: self.min_minutes,
            search: self.search.clone(),
        }
    }
}

impl Default for AnalysisParams {
    fn default() -> Self {
        AnalysisParams::from_config(&AnalysisConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub filtered: FilterOutcome,
    pub overview: Overview,
    pub top_picks: Vec<MergedRecord>,
    pub late_finds: Vec<MergedRecord>,
    pub underdelivering: Vec<MergedRecord>,
    pub teams: Vec<TeamSummary>,
    /// Selected team; `None` when unselected or it has no filtered players
    pub team: Option<TeamSummary>,
    /// Compared players in requested order, looked up across all merged
    /// records so the minutes threshold never hides an explicit pick
    pub comparison: Vec<MergedRecord>,
}

/// Filter, then aggregate over the filtered view
pub fn analyze(records: &[MergedRecord], params: &AnalysisParams) -> Analysis {
    let filtered = FilterEngine::apply(records, &params.criteria());
    let view = filtered.records();
    let names: Vec<&str> = params.compare.iter().map(String::as_str).collect();

    Analysis {
        overview: overview(view, params.metric),
        top_picks: top_picks(view, params.top_pick_max),
        late_finds: best_late_finds(view, params.late_pick_min, params.metric, params.limit),
        underdelivering: underdelivering_early_picks(
            view,
            params.top_pick_max,
            params.metric,
            params.limit,
        ),
        teams: team_summaries(view),
        team: params
            .team
            .as_deref()
            .and_then(|team| team_summary(view, team)),
        comparison: compare_players(records, &names),
        filtered,
    }
}

// ============================================================================
// TESTS
// ============================================================================
