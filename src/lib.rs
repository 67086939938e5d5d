// Draft Insight - Core Library
// Reconciles draft order with season performance; used by the CLI and dashboard

pub mod error;
pub mod table;          // Raw tables: CSV / HTML, multi-level headers
pub mod identity;       // Identity keys for cross-table matching
pub mod schema;         // Column schemas with positional fallback
pub mod scoring;        // Composite score + true shooting
pub mod parser;         // Draft / season normalizers
pub mod reconciliation; // Draft ⋈ season join
pub mod filter;         // Minutes + search predicates
pub mod aggregate;      // Correlation, rankings, team summaries
pub mod provider;       // Source data providers
pub mod cache;          // Explicit per-run table cache
pub mod config;         // JSON configuration
pub mod pipeline;       // Run orchestration + session analysis

// Re-export commonly used types
pub use error::{ConfigError, FetchError, ParseError, PipelineError};
pub use table::RawTable;
pub use identity::normalize;
pub use schema::{ColumnSpec, ColumnSource, RequiredRule, ResolvedColumns, TableSchema};
pub use scoring::{composite_score, round2, true_shooting_pct};
pub use parser::{
    DraftRecord, SeasonStatRecord, StatLine, ParseStats,
    TableNormalizer, DraftTableNormalizer, SeasonTableNormalizer,
    parse_number,
};
pub use reconciliation::{
    Reconciler, ReconciliationReport, MergedRecord, AmbiguityPolicy, AmbiguousMatch,
};
pub use filter::{FilterCriteria, FilterEngine, FilterOutcome};
pub use aggregate::{
    Metric, TeamSummary, Overview,
    correlation, top_picks, best_late_finds, underdelivering_early_picks,
    team_summary, team_summaries, overview, compare_players,
};
pub use provider::{
    SourceDataProvider, SourceKey, SourceLocation, LocationProvider, StaticProvider,
};
pub use cache::TableCache;
pub use config::AnalysisConfig;
pub use pipeline::{Pipeline, PipelineRun, AnalysisParams, Analysis, analyze};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
