// 🪪 Identity Keys - Canonical player-matching keys
// "Jaylen Wells Jr." and "Jaylen Wells" must land on the same key.

/// Generational suffix tokens, compared without their trailing period
const SUFFIXES: [&str; 5] = ["Jr", "Sr", "III", "II", "IV"];

/// Normalize a raw player name into its identity key
///
/// Trims, then strips trailing generational suffixes (`Jr.`, `Sr.`, `III`,
/// `II`, `IV`, period optional) that follow whitespace. Matching stays
/// case-sensitive. Pure and idempotent.
///
/// ```
/// use draft_insight::identity::normalize;
///
/// assert_eq!(normalize("  John Smith Jr. "), "John Smith");
/// assert_eq!(normalize("Pat Doe III"), "Pat Doe");
/// assert_eq!(normalize("Jr."), "Jr.");
/// ```
pub fn normalize(raw_name: &str) -> String {
    let mut name = raw_name.trim();

    while let Some(base) = strip_suffix_token(name) {
        name = base;
    }

    name.to_string()
}

/// Base name if `name` ends in whitespace + suffix token
fn strip_suffix_token(name: &str) -> Option<&str> {
    let split_at = name.rfind(char::is_whitespace)?;
    let last = name[split_at..].trim_start();
    let token = last.strip_suffix('.').unwrap_or(last);

    if SUFFIXES.iter().any(|suffix| *suffix == token) {
        Some(name[..split_at].trim_end())
    } else {
        None
    }
}

/// True when two raw names resolve to the same identity
pub fn same_identity(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

// ============================================================================
// TESTS
// ============================================================================
