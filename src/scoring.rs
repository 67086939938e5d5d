// 🧮 Scoring - Composite performance metric
// Fixed weights: defensive stats (steals, blocks) count 3x a point.

pub const POINTS_WEIGHT: f64 = 1.0;
pub const ASSISTS_WEIGHT: f64 = 1.5;
pub const REBOUNDS_WEIGHT: f64 = 1.2;
pub const STEALS_WEIGHT: f64 = 3.0;
pub const BLOCKS_WEIGHT: f64 = 3.0;

/// Free throw attempts weight in true shooting attempts
const FTA_WEIGHT: f64 = 0.44;

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Composite score from per-game stats
///
/// Missing operands contribute 0; points is always present.
///
/// ```
/// use draft_insight::scoring::composite_score;
///
/// let score = composite_score(20.0, Some(5.0), Some(8.0), Some(2.0), Some(1.0));
/// assert_eq!(score, 46.1);
/// ```
pub fn composite_score(
    points: f64,
    assists: Option<f64>,
    rebounds: Option<f64>,
    steals: Option<f64>,
    blocks: Option<f64>,
) -> f64 {
    let raw = points * POINTS_WEIGHT
        + assists.unwrap_or(0.0) * ASSISTS_WEIGHT
        + rebounds.unwrap_or(0.0) * REBOUNDS_WEIGHT
        + steals.unwrap_or(0.0) * STEALS_WEIGHT
        + blocks.unwrap_or(0.0) * BLOCKS_WEIGHT;

    round2(raw)
}

/// True shooting percentage: PTS / (2 * (FGA + 0.44 * FTA)) * 100
///
/// `None` unless both attempt counts are known and the denominator is positive.
pub fn true_shooting_pct(
    points: f64,
    field_goal_attempts: Option<f64>,
    free_throw_attempts: Option<f64>,
) -> Option<f64> {
    let fga = field_goal_attempts?;
    let fta = free_throw_attempts?;
    let attempts = 2.0 * (fga + FTA_WEIGHT * fta);

    if attempts > 0.0 {
        Some(round2(points / attempts * 100.0))
    } else {
        None
    }
}

// ============================================================================
// TESTS
// ============================================================================
