// 📋 Raw Tables - Untyped input as handed over by a source provider
// Headers may be multi-level (HTML tables with grouped columns); cells are raw strings.

use crate::error::FetchError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

// ============================================================================
// RAW TABLE
// ============================================================================

/// RawTable - A scraped or loaded table before any typing
///
/// `header_rows` holds one entry per header level (outermost first).
/// Row and header widths are not required to agree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub header_rows: Vec<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(header_rows: Vec<Vec<String>>, rows: Vec<Vec<String>>) -> Self {
        RawTable { header_rows, rows }
    }

    /// Build a single-header table from string slices
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        RawTable {
            header_rows: vec![headers.iter().map(|h| h.to_string()).collect()],
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest header level or row
    pub fn width(&self) -> usize {
        self.header_rows
            .iter()
            .chain(self.rows.iter())
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }

    /// Collapse multi-level headers to a single level
    ///
    /// The innermost level wins; a blank inner cell falls back to the
    /// nearest non-blank outer level.
    pub fn collapsed_headers(&self) -> Vec<String> {
        (0..self.width())
            .map(|col| {
                self.header_rows
                    .iter()
                    .rev()
                    .filter_map(|level| level.get(col))
                    .map(|cell| cell.trim())
                    .find(|cell| !cell.is_empty())
                    .unwrap_or("")
                    .to_string()
            })
            .collect()
    }

    /// Cell text, `None` when the row is shorter than `col`
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    // ========================================================================
    // CSV
    // ========================================================================

    /// Read CSV where the first `header_rows` records form the header levels
    pub fn from_csv_reader<R: Read>(reader: R, header_rows: usize) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut table = RawTable::default();
        for (index, result) in reader.records().enumerate() {
            let record = result?;
            let cells: Vec<String> = record.iter().map(|c| c.to_string()).collect();
            if index < header_rows {
                table.header_rows.push(cells);
            } else {
                table.rows.push(cells);
            }
        }

        Ok(table)
    }

    pub fn from_csv_path(path: &Path, header_rows: usize) -> Result<Self, FetchError> {
        let file = File::open(path).map_err(|source| FetchError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::from_csv_reader(file, header_rows)?)
    }

    // ========================================================================
    // HTML
    // ========================================================================

    /// Extract the first `<table>` of an HTML document
    ///
    /// Rows inside `<thead>` become header levels (with `colspan` expanded);
    /// without a `<thead>` the first row is the header. Inner markup is
    /// stripped and common entities decoded. Returns `None` when the document
    /// has no table or the table has no rows.
    pub fn from_html(html: &str) -> Option<Self> {
        // ASCII lowercasing keeps byte offsets aligned with `html`
        let lower = html.to_ascii_lowercase();

        let start = find_tag(&lower, "table", 0)?;
        let end = lower[start..]
            .find("</table>")
            .map(|i| start + i)
            .unwrap_or(lower.len());

        let thead = find_tag(&lower[..end], "thead", start).map(|s| {
            let e = lower[s..end].find("</thead>").map(|i| s + i).unwrap_or(end);
            (s, e)
        });

        let mut header_rows = Vec::new();
        let mut rows = Vec::new();
        let mut pos = start;

        while let Some(tr) = find_tag(&lower[..end], "tr", pos) {
            let tr_end = lower[tr + 3..end]
                .find("</tr>")
                .map(|i| tr + 3 + i)
                .or_else(|| find_tag(&lower[..end], "tr", tr + 3))
                .unwrap_or(end);

            let cells = parse_cells(&html[tr..tr_end], &lower[tr..tr_end]);
            let in_thead = thead.map_or(false, |(s, e)| tr >= s && tr < e);

            if in_thead {
                header_rows.push(cells);
            } else if !cells.is_empty() {
                rows.push(cells);
            }
            pos = tr_end;
        }

        if header_rows.is_empty() && !rows.is_empty() {
            header_rows.push(rows.remove(0));
        }

        if header_rows.is_empty() {
            return None;
        }

        Some(RawTable { header_rows, rows })
    }
}

/// Position of the next `<name` opening tag, skipping longer tag names
/// (`<tr` must not match `<track`, `<th` must not match `<thead`)
fn find_tag(lower: &str, name: &str, from: usize) -> Option<usize> {
    let needle = format!("<{}", name);
    let mut pos = from;

    while let Some(i) = lower.get(pos..)?.find(&needle) {
        let at = pos + i;
        let next = lower.as_bytes().get(at + needle.len()).copied();
        if matches!(next, Some(b'>' | b' ' | b'\t' | b'\n' | b'\r' | b'/')) {
            return Some(at);
        }
        pos = at + needle.len();
    }

    None
}

/// Split one `<tr>` segment into cell texts, expanding `colspan`
fn parse_cells(segment: &str, lower: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut pos = 0;

    loop {
        let next_th = find_tag(lower, "th", pos);
        let next_td = find_tag(lower, "td", pos);
        let open = match (next_th, next_td) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => break,
        };

        let Some(gt) = lower[open..].find('>').map(|i| open + i) else {
            break;
        };
        let attrs = &lower[open..gt];

        let content_start = gt + 1;
        let content_end = [lower[content_start..].find("</td"), lower[content_start..].find("</th")]
            .into_iter()
            .flatten()
            .min()
            .map(|i| content_start + i)
            .or_else(|| {
                // Unclosed cell: runs until the next cell opens
                [find_tag(lower, "td", content_start), find_tag(lower, "th", content_start)]
                    .into_iter()
                    .flatten()
                    .min()
            })
            .unwrap_or(lower.len());

        let text = clean_cell(&segment[content_start..content_end]);
        for _ in 0..colspan(attrs) {
            cells.push(text.clone());
        }

        pos = content_end;
    }

    cells
}

/// Browsers clamp `colspan` to this
const MAX_COLSPAN: usize = 1000;

fn colspan(attrs: &str) -> usize {
    attrs
        .find("colspan=")
        .map(|i| {
            attrs[i + "colspan=".len()..]
                .trim_start_matches(['"', '\''])
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect::<String>()
        })
        .filter(|digits| !digits.is_empty())
        // Too many digits for usize is still just "very wide"
        .map(|digits| digits.parse::<usize>().unwrap_or(usize::MAX))
        .filter(|n| *n > 0)
        .map(|n| n.min(MAX_COLSPAN))
        .unwrap_or(1)
}

/// Strip tags, decode entities, collapse whitespace
fn clean_cell(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut in_tag = false;
    for c in raw.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    decode_entities(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp..];

        let decoded = after.find(';').filter(|semi| *semi <= 10).and_then(|semi| {
            let entity = &after[1..semi];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" | "#39" => Some('\''),
                "nbsp" => Some(' '),
                _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                    u32::from_str_radix(&entity[2..], 16).ok().and_then(char::from_u32)
                }
                _ if entity.starts_with('#') => {
                    entity[1..].parse::<u32>().ok().and_then(char::from_u32)
                }
                _ => None,
            };
            c.map(|c| (c, semi + 1))
        });

        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = &after[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

// ============================================================================
// TESTS
// ============================================================================
