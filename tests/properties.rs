// Property-based tests for identity keys, the draft/season join, filtering
// and aggregation.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::HashSet;

use draft_insight::{
    correlation, normalize, overview, team_summaries, top_picks, AmbiguityPolicy, DraftRecord,
    FilterCriteria, FilterEngine, MergedRecord, Metric, Reconciler, SeasonStatRecord, StatLine,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Raw names: words, stray whitespace, sometimes stacked suffixes
fn arb_raw_name() -> impl Strategy<Value = String> {
    (
        r"\s{0,2}[A-Z][a-z]{0,8}( [A-Z][a-z'\-]{0,8}){0,2}",
        proptest::collection::vec(
            prop_oneof![
                Just(" Jr."),
                Just(" Jr"),
                Just(" Sr."),
                Just(" II"),
                Just(" III"),
                Just(" IV"),
            ],
            0..3,
        ),
        r"\s{0,2}",
    )
        .prop_map(|(base, suffixes, tail)| format!("{}{}{}", base, suffixes.concat(), tail))
}

/// Optional stat value: mostly present, sometimes missing
fn arb_stat() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        4 => (0.0..40.0f64).prop_map(Some),
        1 => Just(None),
    ]
}

fn arb_minutes() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        4 => (0.0..3000.0f64).prop_map(Some),
        1 => Just(None),
    ]
}

/// Draft table with unique picks and unique identity keys, plus a season
/// table drawn from the same name pool (with unknown names mixed in)
fn arb_tables() -> impl Strategy<Value = (Vec<DraftRecord>, Vec<SeasonStatRecord>)> {
    proptest::collection::hash_set(r"[a-z]{1,6}", 1..20).prop_flat_map(|names| {
        let names: Vec<String> = names.into_iter().collect();
        let n = names.len();
        let season_lines = proptest::collection::vec(
            (0..n + 3, 0.0..40.0f64, arb_stat(), arb_stat(), arb_minutes()),
            0..30,
        );
        (Just(names), season_lines)
    })
    .prop_map(|(names, season_lines)| {
        let drafts: Vec<DraftRecord> = names
            .iter()
            .enumerate()
            .map(|(i, name)| DraftRecord::new(i as u32 + 1, name, "TM"))
            .collect();

        let seasons = season_lines
            .into_iter()
            .map(|(index, points, assists, rebounds, minutes)| {
                let name = names
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| format!("Undrafted {}", index));
                SeasonStatRecord::new(
                    &name,
                    StatLine {
                        assists,
                        rebounds,
                        minutes,
                        ..StatLine::points(points)
                    },
                )
            })
            .collect();

        (drafts, seasons)
    })
}

fn arb_merged() -> impl Strategy<Value = Vec<MergedRecord>> {
    proptest::collection::vec(
        (
            1u32..61,
            r"[A-Z][a-z]{1,6} [A-Z][a-z]{1,8}",
            prop_oneof![Just("ATL"), Just("WAS"), Just("OKC"), Just("")],
            0.0..40.0f64,
            arb_stat(),
            arb_minutes(),
        ),
        0..25,
    )
    .prop_map(|rows| {
        // One record per pick, as in a reconciled draft class
        let mut seen = HashSet::new();
        rows.into_iter()
            .filter(|row| seen.insert(row.0))
            .map(|(pick, name, team, points, rebounds, minutes)| {
                let draft = DraftRecord::new(pick, &name, team);
                let season = SeasonStatRecord::new(
                    &name,
                    StatLine {
                        rebounds,
                        minutes,
                        ..StatLine::points(points)
                    },
                );
                MergedRecord::from_parts(&draft, &season)
            })
            .collect()
    })
}

// ---------------------------------------------------------------------------
// Identity keys
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn normalize_is_idempotent(raw in arb_raw_name()) {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn suffixed_name_shares_identity(base in r"[A-Z][a-z]{1,8} [A-Z][a-z]{1,8}",
                                     suffix in prop_oneof![Just("Jr."), Just("III"), Just("II")]) {
        let suffixed = format!("{} {}", base, suffix);
        prop_assert_eq!(normalize(&suffixed), normalize(&base));
    }
}

// ---------------------------------------------------------------------------
// Join
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn join_never_outgrows_either_side((drafts, seasons) in arb_tables()) {
        for policy in [AmbiguityPolicy::FirstMatch, AmbiguityPolicy::Reject] {
            let report = Reconciler::with_policy(policy).reconcile(&drafts, &seasons);

            prop_assert!(report.merged.len() <= drafts.len());
            prop_assert!(report.merged.len() <= seasons.len());
            prop_assert_eq!(
                report.merged.len() + report.unmatched_drafts.len()
                    + if policy == AmbiguityPolicy::Reject { report.ambiguous.len() } else { 0 },
                drafts.len()
            );
        }
    }

    #[test]
    fn join_keeps_draft_pick_and_order((drafts, seasons) in arb_tables()) {
        let merged = Reconciler::new().join(&drafts, &seasons);

        let picks: Vec<u32> = merged.iter().map(|m| m.pick).collect();
        let mut sorted = picks.clone();
        sorted.sort_unstable();
        prop_assert_eq!(&picks, &sorted);

        for record in &merged {
            let draft = drafts.iter().find(|d| d.pick == record.pick);
            prop_assert!(draft.is_some());
            if let Some(draft) = draft {
                prop_assert_eq!(&record.player_name, &draft.player_name);
                prop_assert_eq!(&record.drafted_team, &draft.drafted_team);
            }
        }

        let unique: HashSet<u32> = picks.iter().copied().collect();
        prop_assert_eq!(unique.len(), picks.len());
    }

    #[test]
    fn first_match_takes_earliest_season_line((drafts, seasons) in arb_tables()) {
        let merged = Reconciler::new().join(&drafts, &seasons);

        for record in &merged {
            let first = seasons.iter().find(|s| s.identity_key == record.identity_key);
            prop_assert_eq!(first.map(|s| s.points), Some(record.points));
        }
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn raising_min_minutes_only_removes(records in arb_merged(),
                                        low in 0.0..3000.0f64,
                                        delta in 0.0..1000.0f64) {
        let loose = FilterEngine::filter(&records, &FilterCriteria::new(low));
        let strict = FilterEngine::filter(&records, &FilterCriteria::new(low + delta));

        prop_assert!(strict.len() <= loose.len());
        for record in &strict {
            prop_assert!(loose.contains(record));
        }
    }

    #[test]
    fn filtered_records_satisfy_both_predicates(records in arb_merged(),
                                                 min in 0.0..3000.0f64,
                                                 needle in r"[a-z]{0,2}") {
        let criteria = FilterCriteria::new(min).with_search(needle.clone());
        for record in FilterEngine::filter(&records, &criteria) {
            prop_assert!(record.minutes.map_or(false, |m| m >= min));
            prop_assert!(record.player_name.to_lowercase().contains(&needle));
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn aggregates_ignore_input_order(
        (records, shuffled) in arb_merged().prop_flat_map(|records| {
            let shuffled = Just(records.clone()).prop_shuffle();
            (Just(records), shuffled)
        })
    ) {
        for metric in [Metric::Points, Metric::Rebounds, Metric::Minutes, Metric::Composite] {
            let a = correlation(&records, metric);
            let b = correlation(&shuffled, metric);
            prop_assert_eq!(a, b);
            prop_assert!((-1.0..=1.0).contains(&a));
        }

        prop_assert_eq!(top_picks(&records, 10), top_picks(&shuffled, 10));
        prop_assert_eq!(team_summaries(&records), team_summaries(&shuffled));
        prop_assert_eq!(
            overview(&records, Metric::Points),
            overview(&shuffled, Metric::Points)
        );
    }
}
