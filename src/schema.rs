// 📐 Shape Layer - Column Schemas
// Declares which columns a normalizer needs and resolves them once per table.

use crate::error::ParseError;
use crate::table::RawTable;
use std::collections::HashMap;

// ============================================================================
// COLUMN SPECS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Logical field name used by the normalizer
    pub field: &'static str,
    /// Header names accepted for this field (first is canonical)
    pub aliases: &'static [&'static str],
    /// Position used when no header matches (schema drift)
    pub fallback_position: Option<usize>,
    pub required: bool,
}

impl ColumnSpec {
    pub const fn required(field: &'static str, aliases: &'static [&'static str]) -> Self {
        ColumnSpec {
            field,
            aliases,
            fallback_position: None,
            required: true,
        }
    }

    pub const fn optional(field: &'static str, aliases: &'static [&'static str]) -> Self {
        ColumnSpec {
            field,
            aliases,
            fallback_position: None,
            required: false,
        }
    }

    pub fn with_fallback(mut self, position: usize) -> Self {
        self.fallback_position = Some(position);
        self
    }

    fn canonical_name(&self) -> &'static str {
        self.aliases.first().copied().unwrap_or(self.field)
    }

    fn matches_header(&self, header: &str) -> bool {
        let header = header.trim();
        self.aliases
            .iter()
            .any(|alias| alias.eq_ignore_ascii_case(header))
    }
}

/// How missing required columns turn into a `ParseError`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredRule {
    /// Every required column must resolve
    AllOf,
    /// Fail only when no required column resolves
    AnyOf,
}

/// Where a field's column was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSource {
    Named(String),
    Positional(usize),
}

#[derive(Debug, Clone)]
pub struct TableSchema {
    pub table: &'static str,
    pub columns: Vec<ColumnSpec>,
    pub rule: RequiredRule,
}

impl TableSchema {
    pub fn new(table: &'static str, columns: Vec<ColumnSpec>, rule: RequiredRule) -> Self {
        TableSchema {
            table,
            columns,
            rule,
        }
    }

    /// Map every declared field to a column index
    ///
    /// Named headers are matched first; positional fallbacks only claim
    /// columns no named match has taken and that exist in the table.
    pub fn resolve(&self, table: &RawTable) -> Result<ResolvedColumns, ParseError> {
        let headers = table.collapsed_headers();
        let width = table.width();
        let mut resolved = ResolvedColumns::default();

        for spec in &self.columns {
            if let Some(index) = headers.iter().position(|h| spec.matches_header(h)) {
                resolved.insert(spec.field, index, ColumnSource::Named(headers[index].clone()));
            }
        }

        for spec in &self.columns {
            if resolved.get(spec.field).is_some() {
                continue;
            }
            if let Some(position) = spec.fallback_position {
                if position < width && !resolved.claims(position) {
                    resolved.insert(spec.field, position, ColumnSource::Positional(position));
                }
            }
        }

        let required: Vec<&ColumnSpec> = self.columns.iter().filter(|c| c.required).collect();
        let missing: Vec<String> = required
            .iter()
            .filter(|c| resolved.get(c.field).is_none())
            .map(|c| c.canonical_name().to_string())
            .collect();

        let fails = match self.rule {
            RequiredRule::AllOf => !missing.is_empty(),
            RequiredRule::AnyOf => !required.is_empty() && missing.len() == required.len(),
        };

        if fails {
            return Err(ParseError::MissingColumns {
                table: self.table.to_string(),
                columns: missing,
            });
        }

        Ok(resolved)
    }
}

// ============================================================================
// RESOLVED COLUMNS
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ResolvedColumns {
    positions: HashMap<&'static str, (usize, ColumnSource)>,
}

impl ResolvedColumns {
    fn insert(&mut self, field: &'static str, index: usize, source: ColumnSource) {
        self.positions.insert(field, (index, source));
    }

    fn claims(&self, index: usize) -> bool {
        self.positions.values().any(|(i, _)| *i == index)
    }

    pub fn get(&self, field: &str) -> Option<usize> {
        self.positions.get(field).map(|(i, _)| *i)
    }

    pub fn source(&self, field: &str) -> Option<&ColumnSource> {
        self.positions.get(field).map(|(_, s)| s)
    }

    /// Trimmed, non-empty cell for `field` in `row`
    pub fn cell<'a>(&self, table: &'a RawTable, row: usize, field: &str) -> Option<&'a str> {
        let col = self.get(field)?;
        table
            .cell(row, col)
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

// ============================================================================
// TESTS
// ============================================================================
