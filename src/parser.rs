// 🏗️ Table Normalizers
// Raw draft / season tables → typed records with identity keys

use crate::error::ParseError;
use crate::identity::normalize;
use crate::schema::{ColumnSpec, RequiredRule, ResolvedColumns, TableSchema};
use crate::scoring::{composite_score, true_shooting_pct};
use crate::table::RawTable;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

// ============================================================================
// CORE TYPES
// ============================================================================

/// DraftRecord - One drafted player, as listed in the draft-order table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRecord {
    pub pick: u32,
    pub player_name: String,
    pub drafted_team: String,
    pub identity_key: String,
}

impl DraftRecord {
    pub fn new(pick: u32, player_name: &str, drafted_team: &str) -> Self {
        let player_name = player_name.trim();
        DraftRecord {
            pick,
            player_name: player_name.to_string(),
            drafted_team: drafted_team.trim().to_string(),
            identity_key: normalize(player_name),
        }
    }
}

/// Per-game stat cells of one season row
///
/// Every stat except points may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatLine {
    pub points: f64,
    pub field_goal_pct: Option<f64>,
    pub three_point_pct: Option<f64>,
    pub rebounds: Option<f64>,
    pub assists: Option<f64>,
    pub steals: Option<f64>,
    pub blocks: Option<f64>,
    pub minutes: Option<f64>,
    pub field_goal_attempts: Option<f64>,
    pub free_throw_attempts: Option<f64>,
}

impl StatLine {
    pub fn points(points: f64) -> Self {
        StatLine {
            points,
            ..StatLine::default()
        }
    }
}

/// SeasonStatRecord - One player's season line with derived scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonStatRecord {
    pub player_name: String,
    pub identity_key: String,
    pub points: f64,
    pub field_goal_pct: Option<f64>,
    pub three_point_pct: Option<f64>,
    pub rebounds: Option<f64>,
    pub assists: Option<f64>,
    pub steals: Option<f64>,
    pub blocks: Option<f64>,
    /// Never negative
    pub minutes: Option<f64>,
    pub true_shooting_pct: Option<f64>,
    pub composite_score: f64,
}

impl SeasonStatRecord {
    /// Build a record, deriving identity key and scores once
    pub fn new(player_name: &str, line: StatLine) -> Self {
        let player_name = player_name.trim();

        SeasonStatRecord {
            player_name: player_name.to_string(),
            identity_key: normalize(player_name),
            points: line.points,
            field_goal_pct: line.field_goal_pct,
            three_point_pct: line.three_point_pct,
            rebounds: line.rebounds,
            assists: line.assists,
            steals: line.steals,
            blocks: line.blocks,
            minutes: line.minutes.filter(|m| *m >= 0.0),
            true_shooting_pct: true_shooting_pct(
                line.points,
                line.field_goal_attempts,
                line.free_throw_attempts,
            ),
            composite_score: composite_score(
                line.points,
                line.assists,
                line.rebounds,
                line.steals,
                line.blocks,
            ),
        }
    }
}

/// Row accounting for one parse; dropped rows are never reported individually
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    pub rows: usize,
    pub kept: usize,
    pub dropped: usize,
}

// ============================================================================
// NORMALIZER TRAIT
// ============================================================================

/// TableNormalizer - Turns one kind of raw table into typed records
///
/// Fails only on unusable table shape; malformed rows are dropped.
pub trait TableNormalizer {
    type Record;

    /// Table label used in errors and logs
    fn table_name(&self) -> &'static str;

    fn parse_with_stats(&self, table: &RawTable) -> Result<(Vec<Self::Record>, ParseStats), ParseError>;

    fn parse(&self, table: &RawTable) -> Result<Vec<Self::Record>, ParseError> {
        self.parse_with_stats(table).map(|(records, _)| records)
    }
}

fn ensure_rows(table: &RawTable, name: &str) -> Result<(), ParseError> {
    if table.is_empty() {
        return Err(ParseError::EmptyTable {
            table: name.to_string(),
        });
    }
    Ok(())
}

/// Lenient numeric coercion; anything unusable is missing
///
/// Accepts `.456`, `+3`, and thousands separators (`1,234`).
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Pick numbers must be positive integers
fn parse_pick(raw: &str) -> Option<u32> {
    let value = parse_number(raw)?;
    if value >= 1.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}

// ============================================================================
// DRAFT TABLE
// ============================================================================

pub struct DraftTableNormalizer {
    schema: TableSchema,
}

impl DraftTableNormalizer {
    pub fn new() -> Self {
        DraftTableNormalizer {
            schema: TableSchema::new(
                "draft",
                vec![
                    ColumnSpec::required("pick", &["Pk", "Pick", "#"]).with_fallback(0),
                    ColumnSpec::required("player", &["Player", "Name"]).with_fallback(1),
                    ColumnSpec::required("team", &["Tm", "Team"]).with_fallback(2),
                ],
                RequiredRule::AnyOf,
            ),
        }
    }
}

impl Default for DraftTableNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableNormalizer for DraftTableNormalizer {
    type Record = DraftRecord;

    fn table_name(&self) -> &'static str {
        "draft"
    }

    fn parse_with_stats(&self, table: &RawTable) -> Result<(Vec<DraftRecord>, ParseStats), ParseError> {
        ensure_rows(table, self.table_name())?;
        let columns = self.schema.resolve(table)?;

        let mut records = Vec::new();
        let mut seen_picks = HashSet::new();
        let mut stats = ParseStats {
            rows: table.row_count(),
            ..ParseStats::default()
        };

        for row in 0..table.row_count() {
            let Some(pick) = columns.cell(table, row, "pick").and_then(parse_pick) else {
                debug!(row, "draft row dropped: no usable pick number");
                stats.dropped += 1;
                continue;
            };

            let Some(player) = columns.cell(table, row, "player") else {
                debug!(row, pick, "draft row dropped: no player name");
                stats.dropped += 1;
                continue;
            };

            if !seen_picks.insert(pick) {
                debug!(row, pick, "draft row dropped: duplicate pick");
                stats.dropped += 1;
                continue;
            }

            let team = columns.cell(table, row, "team").unwrap_or("");
            records.push(DraftRecord::new(pick, player, team));
        }

        stats.kept = records.len();
        info!(
            kept = stats.kept,
            dropped = stats.dropped,
            "parsed draft table"
        );

        Ok((records, stats))
    }
}

// ============================================================================
// SEASON TABLE
// ============================================================================

pub struct SeasonTableNormalizer {
    schema: TableSchema,
}

impl SeasonTableNormalizer {
    pub fn new() -> Self {
        SeasonTableNormalizer {
            schema: TableSchema::new(
                "season",
                vec![
                    ColumnSpec::required("player", &["Player"]),
                    ColumnSpec::required("points", &["PTS"]),
                    ColumnSpec::optional("fg_pct", &["FG%"]),
                    ColumnSpec::optional("three_pct", &["3P%"]),
                    ColumnSpec::optional("rebounds", &["TRB"]),
                    ColumnSpec::optional("assists", &["AST"]),
                    ColumnSpec::optional("steals", &["STL"]),
                    ColumnSpec::optional("blocks", &["BLK"]),
                    ColumnSpec::optional("minutes", &["MP"]),
                    ColumnSpec::optional("fga", &["FGA"]),
                    ColumnSpec::optional("fta", &["FTA"]),
                ],
                RequiredRule::AllOf,
            ),
        }
    }

    fn stat(columns: &ResolvedColumns, table: &RawTable, row: usize, field: &str) -> Option<f64> {
        columns.cell(table, row, field).and_then(parse_number)
    }
}

impl Default for SeasonTableNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableNormalizer for SeasonTableNormalizer {
    type Record = SeasonStatRecord;

    fn table_name(&self) -> &'static str {
        "season"
    }

    fn parse_with_stats(
        &self,
        table: &RawTable,
    ) -> Result<(Vec<SeasonStatRecord>, ParseStats), ParseError> {
        ensure_rows(table, self.table_name())?;
        let columns = self.schema.resolve(table)?;

        let mut records = Vec::new();
        let mut stats = ParseStats {
            rows: table.row_count(),
            ..ParseStats::default()
        };

        for row in 0..table.row_count() {
            let Some(player) = columns.cell(table, row, "player") else {
                debug!(row, "season row dropped: no player name");
                stats.dropped += 1;
                continue;
            };

            // Points anchors the row; everything else may be missing
            let Some(points) = Self::stat(&columns, table, row, "points") else {
                debug!(row, player, "season row dropped: no usable points");
                stats.dropped += 1;
                continue;
            };

            let line = StatLine {
                points,
                field_goal_pct: Self::stat(&columns, table, row, "fg_pct"),
                three_point_pct: Self::stat(&columns, table, row, "three_pct"),
                rebounds: Self::stat(&columns, table, row, "rebounds"),
                assists: Self::stat(&columns, table, row, "assists"),
                steals: Self::stat(&columns, table, row, "steals"),
                blocks: Self::stat(&columns, table, row, "blocks"),
                minutes: Self::stat(&columns, table, row, "minutes"),
                field_goal_attempts: Self::stat(&columns, table, row, "fga"),
                free_throw_attempts: Self::stat(&columns, table, row, "fta"),
            };

            records.push(SeasonStatRecord::new(player, line));
        }

        stats.kept = records.len();
        info!(
            kept = stats.kept,
            dropped = stats.dropped,
            "parsed season table"
        );

        Ok((records, stats))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn draft_table() -> RawTable {
        RawTable::new(
            vec![
                vec!["".into(), "".into(), "".into(), "Round 1".into()],
                vec!["Rk".into(), "Pk".into(), "Tm".into(), "Player".into()],
            ],
            vec![
                vec!["1".into(), "1".into(), "ATL".into(), " Zaccharie Risacher ".into()],
                vec!["2".into(), "2".into(), "WAS".into(), "Alex Sarr".into()],
                vec!["Rk".into(), "Pk".into(), "Tm".into(), "Player".into()],
                vec!["3".into(), "".into(), "HOU".into(), "Reed Sheppard".into()],
                vec!["4".into(), "4".into(), "SAS".into(), "Stephon Castle".into()],
                vec!["5".into(), "5".into(), "DET".into(), "".into()],
                vec!["6".into(), "4".into(), "CHA".into(), "Duplicate Pick".into()],
                vec!["7".into(), "7.5".into(), "POR".into(), "Half Pick".into()],
                vec!["8".into(), "21".into(), "NOP".into(), "Yves Missi".into()],
                vec!["9".into(), "22".into()],
                vec!["10".into(), "23".into(), "WAS".into(), "Ron Holland II".into()],
            ],
        )
    }

    #[test]
    fn test_draft_parse_degrades_row_by_row() {
        let (records, stats) = DraftTableNormalizer::new()
            .parse_with_stats(&draft_table())
            .unwrap();

        let picks: Vec<u32> = records.iter().map(|r| r.pick).collect();
        assert_eq!(picks, vec![1, 2, 4, 21, 23]);
        assert_eq!(stats.rows, 11);
        assert_eq!(stats.kept, 5);
        assert_eq!(stats.dropped, 6);

        assert_eq!(records[0].player_name, "Zaccharie Risacher");
        assert_eq!(records[0].drafted_team, "ATL");
        assert_eq!(records[4].identity_key, "Ron Holland");
        assert_eq!(records[4].player_name, "Ron Holland II");

        println!("✅ Draft parse: {} kept, {} dropped", stats.kept, stats.dropped);
    }

    #[test]
    fn test_draft_positional_fallback() {
        let table = RawTable::from_rows(
            &["No.", "Prospect", "Club"],
            &[&["1", "A", "ATL"], &["2", "B", "WAS"]],
        );
        let records = DraftTableNormalizer::new().parse(&table).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].pick, 2);
        assert_eq!(records[1].player_name, "B");
        assert_eq!(records[1].drafted_team, "WAS");
    }

    #[test]
    fn test_draft_missing_team_keeps_row() {
        let table = RawTable::from_rows(&["Pk", "Player"], &[&["1", "A"]]);
        let records = DraftTableNormalizer::new().parse(&table).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].drafted_team, "");
    }

    #[test]
    fn test_draft_empty_table_fails() {
        let table = RawTable::from_rows(&["Pk", "Player", "Tm"], &[]);
        let err = DraftTableNormalizer::new().parse(&table).unwrap_err();

        assert_eq!(
            err,
            ParseError::EmptyTable {
                table: "draft".to_string()
            }
        );
    }

    #[test]
    fn test_draft_no_usable_columns_fails() {
        let table = RawTable::new(vec![vec![]], vec![vec![]]);
        let err = DraftTableNormalizer::new().parse(&table).unwrap_err();

        assert!(matches!(err, ParseError::MissingColumns { .. }));
    }

    fn season_table() -> RawTable {
        RawTable::from_rows(
            &["Rk", "Player", "Pos", "MP", "FG%", "3P%", "TRB", "AST", "STL", "BLK", "PTS"],
            &[
                &["1", "Zaccharie Risacher", "SF", "24.6", ".453", ".356", "3.5", "1.0", "0.7", "0.5", "12.6"],
                &["2", "Alex Sarr", "C", "26.6", ".394", "", "6.6", "2.1", "0.7", "1.5", "13.0"],
                &["Rk", "Player", "Pos", "MP", "FG%", "3P%", "TRB", "AST", "STL", "BLK", "PTS"],
                &["3", "", "PG", "10", "", "", "", "", "", "", "4.0"],
                &["4", "No Points", "PG", "10", "", "", "", "", "", "", ""],
                &["5", "Ron Holland II", "SF", "n/a", "", "", "4.0", "", "", "", "6.0"],
                &["6", "Bad Minutes", "SF", "-3", "", "", "", "", "", "", "1.0"],
            ],
        )
    }

    #[test]
    fn test_season_parse() {
        let (records, stats) = SeasonTableNormalizer::new()
            .parse_with_stats(&season_table())
            .unwrap();

        let names: Vec<&str> = records.iter().map(|r| r.player_name.as_str()).collect();
        assert_eq!(names, vec!["Zaccharie Risacher", "Alex Sarr", "Ron Holland II", "Bad Minutes"]);
        assert_eq!(stats.dropped, 3);

        let sarr = &records[1];
        assert_eq!(sarr.field_goal_pct, Some(0.394));
        assert_eq!(sarr.three_point_pct, None);
        assert_eq!(sarr.minutes, Some(26.6));
        // 13.0 + 2.1*1.5 + 6.6*1.2 + 0.7*3 + 1.5*3 = 30.67
        assert_eq!(sarr.composite_score, 30.67);

        let holland = &records[2];
        assert_eq!(holland.identity_key, "Ron Holland");
        assert_eq!(holland.minutes, None);
        // Missing assists/steals/blocks count as zero: 6.0 + 4.0*1.2
        assert_eq!(holland.composite_score, 10.8);

        assert_eq!(records[3].minutes, None);
    }

    #[test]
    fn test_season_true_shooting_when_attempts_present() {
        let table = RawTable::from_rows(
            &["Player", "PTS", "FGA", "FTA"],
            &[&["A", "20", "15", "5"], &["B", "10", "", "2"]],
        );
        let records = SeasonTableNormalizer::new().parse(&table).unwrap();

        assert_eq!(records[0].true_shooting_pct, Some(58.14));
        assert_eq!(records[1].true_shooting_pct, None);
    }

    #[test]
    fn test_season_requires_player_and_points() {
        let table = RawTable::from_rows(&["Name", "AST"], &[&["A", "3"]]);
        let err = SeasonTableNormalizer::new().parse(&table).unwrap_err();

        assert_eq!(
            err,
            ParseError::MissingColumns {
                table: "season".to_string(),
                columns: vec!["Player".to_string(), "PTS".to_string()],
            }
        );
    }

    #[test]
    fn test_season_empty_table_fails() {
        let table = RawTable::from_rows(&["Player", "PTS"], &[]);
        assert!(matches!(
            SeasonTableNormalizer::new().parse(&table),
            Err(ParseError::EmptyTable { .. })
        ));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" .456 "), Some(0.456));
        assert_eq!(parse_number("1,234.5"), Some(1234.5));
        assert_eq!(parse_number("+3"), Some(3.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("PTS"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_parse_pick() {
        assert_eq!(parse_pick("1"), Some(1));
        assert_eq!(parse_pick("30.0"), Some(30));
        assert_eq!(parse_pick("0"), None);
        assert_eq!(parse_pick("-2"), None);
        assert_eq!(parse_pick("2.5"), None);
    }
}
