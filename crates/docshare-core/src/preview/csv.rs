//! Minimal CSV decoding for tabular previews.
//!
//! Quotes only toggle the "inside quoted field" state; a doubled quote inside
//! a quoted field is not treated as an escaped quote.

use serde::{Deserialize, Serialize};

/// Maximum number of data rows shown in a preview table.
pub const DEFAULT_MAX_ROWS: usize = 50;

/// Splits `text` into rows of trimmed fields.
///
/// Blank lines are dropped. Commas inside double-quoted sections are literal,
/// and the quote characters themselves are removed.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_owned());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    fields.push(current.trim().to_owned());
    fields
}

/// A header row plus a bounded window of data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvTable {
    /// Column titles; blank cells become `Column N` (1-indexed).
    pub headers: Vec<String>,
    /// Displayed rows, each exactly as wide as [`Self::headers`].
    pub rows: Vec<Vec<String>>,
    /// Number of data rows in the source, displayed or not.
    pub total_rows: usize,
}

impl CsvTable {
    /// Parses `text` and keeps at most `max_rows` data rows.
    pub fn parse(text: &str, max_rows: usize) -> Self {
        Self::from_rows(parse_csv(text), max_rows)
    }

    /// Builds a table whose first row is the header.
    pub fn from_rows(rows: Vec<Vec<String>>, max_rows: usize) -> Self {
        let mut rows = rows.into_iter();
        let Some(header_row) = rows.next() else {
            return Self::default();
        };

        let headers: Vec<String> = header_row
            .into_iter()
            .enumerate()
            .map(|(index, header)| {
                if header.is_empty() {
                    format!("Column {}", index + 1)
                } else {
                    header
                }
            })
            .collect();

        let data: Vec<Vec<String>> = rows.collect();
        let total_rows = data.len();
        let width = headers.len();

        let rows = data
            .into_iter()
            .take(max_rows)
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Self {
            headers,
            rows,
            total_rows,
        }
    }

    /// Returns true if the source had no rows at all.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Returns true if some data rows were left out.
    pub fn is_truncated(&self) -> bool {
        self.total_rows > self.rows.len()
    }

    /// Number of data rows left out of the table.
    pub fn remaining(&self) -> usize {
        self.total_rows - self.rows.len()
    }

    /// Human readable truncation notice, if any rows were left out.
    pub fn truncation_notice(&self) -> Option<String> {
        self.is_truncated().then(|| {
            format!(
                "Showing first {} rows of {} total rows",
                self.rows.len(),
                self.total_rows
            )
        })
    }
}
