// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use draft_insight::{
    analyze, AmbiguityPolicy, Analysis, AnalysisConfig, AnalysisParams, Metric, MergedRecord,
    Pipeline, PipelineRun, Reconciler, SourceLocation, TableCache,
};

#[derive(Parser)]
#[command(version, about = "NBA draft position vs current season performance")]
struct Args {
    /// JSON config file
    #[arg(short, long, env = "DRAFT_INSIGHT_CONFIG")]
    config: Option<PathBuf>,

    /// Draft table file, CSV or saved HTML (overrides config)
    #[arg(long)]
    draft_file: Option<PathBuf>,

    /// Season stats file, CSV or saved HTML (overrides config)
    #[arg(long)]
    season_file: Option<PathBuf>,

    /// Exclude players whose name matches several season lines
    #[arg(long)]
    reject_ambiguous: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the analysis and exit
    Report {
        /// Minimum minutes played (inclusive)
        #[arg(long)]
        min_minutes: Option<f64>,

        /// Case-insensitive player name search
        #[arg(long)]
        search: Option<String>,

        /// Metric to compare against draft position (PTS, FG%, 3P%, TRB, AST, ...)
        #[arg(long)]
        metric: Option<Metric>,

        /// Drafting team to summarize
        #[arg(long)]
        team: Option<String>,

        /// Players to show side by side, comma separated
        #[arg(long, value_delimiter = ',')]
        compare: Vec<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Interactive terminal dashboard (default)
    #[cfg(feature = "tui")]
    Ui,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Dashboard owns the terminal: keep logs quiet there
    let default_filter = match args.command {
        Some(Command::Report { .. }) => "draft_insight=info",
        _ => "draft_insight=warn",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(&args)?;

    match args.command {
        Some(Command::Report {
            min_minutes,
            search,
            metric,
            team,
            compare,
            json,
        }) => {
            let mut params = AnalysisParams::from_config(&config);
            if let Some(min_minutes) = min_minutes {
                params.min_minutes = min_minutes;
            }
            if let Some(metric) = metric {
                params.metric = metric;
            }
            params.search = search;
            params.team = team;
            params.compare = compare;

            run_report(&config, &params, json)
        }
        #[cfg(feature = "tui")]
        Some(Command::Ui) => run_ui_mode(&config),
        None => run_ui_mode(&config),
    }
}

fn load_config(args: &Args) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if let Some(path) = &args.draft_file {
        config.draft_source = SourceLocation::File(path.clone());
    }
    if let Some(path) = &args.season_file {
        config.season_source = SourceLocation::File(path.clone());
    }
    if args.reject_ambiguous {
        config.ambiguity_policy = AmbiguityPolicy::Reject;
    }

    Ok(config)
}

/// Run the pipeline; fatal causes end the process with one summarized message
fn load_records(config: &AnalysisConfig) -> PipelineRun {
    let cache = TableCache::new(config.provider());
    let mut pipeline = Pipeline::new(cache, Reconciler::with_policy(config.ambiguity_policy));

    match pipeline.run() {
        Ok(run) => run,
        Err(err) => {
            eprintln!("❌ {}", err);
            eprintln!("   Check the configured sources and try again.");
            std::process::exit(1);
        }
    }
}

fn run_report(config: &AnalysisConfig, params: &AnalysisParams, json: bool) -> Result<()> {
    let run = load_records(config);
    info!(run_id = %run.run_id, "analyzing {} merged records", run.records().len());

    let analysis = analyze(run.records(), params);

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("🏀 Draft Position vs Current Season Performance");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "✓ Draft table: {} players ({} rows skipped)",
        run.draft_stats.kept, run.draft_stats.dropped
    );
    println!(
        "✓ Season table: {} players ({} rows skipped)",
        run.season_stats.kept, run.season_stats.dropped
    );
    println!("✓ {}", run.report.summary());

    if run.is_empty() {
        println!("\n⚠️  No matching data found between draft and season stats");
        return Ok(());
    }

    print_analysis(&analysis, params);
    Ok(())
}

fn print_analysis(analysis: &Analysis, params: &AnalysisParams) {
    let metric = params.metric;

    println!(
        "\n📊 Key Insights ({} ≥ {} minutes{})",
        metric,
        params.min_minutes,
        params
            .search
            .as_deref()
            .map(|s| format!(", search \"{}\"", s))
            .unwrap_or_default()
    );

    if analysis.filtered.is_no_match() {
        println!("\nNo players match the current filters.");
        return;
    }

    let overview = &analysis.overview;
    println!("  Correlation Coefficient: {:.2}", overview.correlation);
    println!("  Players Analyzed:        {}", overview.players);
    match overview.avg_minutes {
        Some(avg) => println!("  Avg Minutes:             {:.1}", avg),
        None => println!("  Avg Minutes:             -"),
    }

    print_records(
        &format!("Top picks (1-{})", params.top_pick_max),
        &analysis.top_picks,
        metric,
    );
    print_records(
        &format!("Best draft value (pick {}+)", params.late_pick_min),
        &analysis.late_finds,
        metric,
    );
    print_records(
        "Early picks not yet delivering",
        &analysis.underdelivering,
        metric,
    );

    if !params.compare.is_empty() {
        print_records("Comparison", &analysis.comparison, metric);
    }

    if let Some(team) = &params.team {
        println!("\n🏟️  {}", team);
        match &analysis.team {
            Some(summary) => {
                println!("  Players:       {}", summary.count);
                println!("  Avg pick:      {:.1}", summary.avg_pick);
                println!("  Total minutes: {:.1}", summary.total_minutes);
                println!("  Avg composite: {:.2}", summary.avg_composite);
                println!("  Avg points:    {:.1}", summary.avg_points);
            }
            None => println!("  No drafted players in the current view"),
        }
    }
}

fn print_records(title: &str, records: &[MergedRecord], metric: Metric) {
    println!("\n{}", title);
    if records.is_empty() {
        println!("  (none)");
        return;
    }

    println!("  {:>4}  {:<28} {:<5} {:>9} {:>7}", "Pk", "Player", "Tm", metric.label(), "MP");
    for record in records {
        println!(
            "  {:>4}  {:<28} {:<5} {:>9} {:>7}",
            record.pick,
            record.player_name,
            record.drafted_team,
            format_stat(metric.value(record)),
            format_stat(record.minutes),
        );
    }
}

fn format_stat(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &AnalysisConfig) -> Result<()> {
    println!("🖥️  Loading draft and season data...\n");

    let run = load_records(config);
    println!("✓ {}", run.report.summary());
    println!("Starting UI... (Press 'q' to quit)\n");

    let params = AnalysisParams::from_config(config);
    let mut app = ui::App::new(run.records().to_vec(), params, config.minutes_step, run.report.summary());
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &AnalysisConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print a report: draft-insight report");
    std::process::exit(1);
}

// ============================================================================
// TESTS
// ============================================================================
