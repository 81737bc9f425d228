//! CSV rendering for sweep results.
//!
//! Rows are rendered by hand into a `String`; the only invariant that
//! matters is structural: every data row must have exactly as many
//! columns as the header (or as the first row, for header-less
//! output). A mismatch is an error at render time, never a silently
//! ragged file.

use std::fmt::Write as _;

use thiserror::Error;

use crate::sweep::SweepRow;

/// Structural errors detected while rendering a report.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    /// A data row's column count differs from the header's.
    #[error("row {row} has {got} columns, expected {expected}")]
    ColumnMismatch { row: usize, expected: usize, got: usize },
}

/// An in-memory CSV document with an optional header line.
#[derive(Debug, Clone, Default)]
pub struct CsvReport {
    header: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
}

impl CsvReport {
    /// A report with a header line emitted before any data rows.
    pub fn with_header(header: Vec<String>) -> Self {
        Self { header: Some(header), rows: Vec::new() }
    }

    /// A header-less report; all rows must still agree on width.
    pub fn headerless() -> Self {
        Self { header: None, rows: Vec::new() }
    }

    /// Append one data row.
    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Append one sweep row: the size, then each average with six
    /// fractional digits.
    pub fn push_sweep_row(&mut self, row: &SweepRow) {
        let mut cells = Vec::with_capacity(row.averages.len() + 1);
        cells.push(row.size.to_string());
        cells.extend(row.averages.iter().map(|avg| format!("{avg:.6}")));
        self.rows.push(cells);
    }

    /// Number of data rows appended so far.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Render the document, enforcing the column-count invariant.
    pub fn render(&self) -> Result<String, ReportError> {
        let expected = match (&self.header, self.rows.first()) {
            (Some(header), _) => header.len(),
            (None, Some(first)) => first.len(),
            (None, None) => 0,
        };

        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != expected {
                return Err(ReportError::ColumnMismatch {
                    row: i,
                    expected,
                    got: row.len(),
                });
            }
        }

        let mut out = String::new();
        if let Some(header) = &self.header {
            let _ = writeln!(out, "{}", header.join(","));
        }
        for row in &self.rows {
            let _ = writeln!(out, "{}", row.join(","));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header3() -> Vec<String> {
        vec!["a".into(), "b".into(), "c".into()]
    }

    #[test]
    fn renders_header_then_rows() {
        let mut report = CsvReport::with_header(header3());
        report.push_row(vec!["1".into(), "2".into(), "3".into()]);
        let out = report.render().unwrap();
        assert_eq!(out, "a,b,c\n1,2,3\n");
    }

    #[test]
    fn rejects_ragged_row() {
        let mut report = CsvReport::with_header(header3());
        report.push_row(vec!["1".into(), "2".into()]);
        assert_eq!(
            report.render(),
            Err(ReportError::ColumnMismatch { row: 0, expected: 3, got: 2 })
        );
    }

    #[test]
    fn headerless_rows_must_agree_with_first() {
        let mut report = CsvReport::headerless();
        report.push_row(vec!["4098".into(), "0.5".into(), "1".into()]);
        report.push_row(vec!["2049".into(), "0.25".into()]);
        assert_eq!(
            report.render(),
            Err(ReportError::ColumnMismatch { row: 1, expected: 3, got: 2 })
        );
    }

    #[test]
    fn headerless_render_has_no_header_line() {
        let mut report = CsvReport::headerless();
        report.push_row(vec!["1".into(), "0".into()]);
        assert_eq!(report.render().unwrap(), "1,0\n");
    }

    #[test]
    fn empty_report_renders_header_only() {
        let report = CsvReport::with_header(header3());
        assert_eq!(report.render().unwrap(), "a,b,c\n");
        assert_eq!(report.row_count(), 0);
    }

    #[test]
    fn sweep_row_formats_six_fraction_digits() {
        let mut report = CsvReport::with_header(vec!["matrix_size".into(), "v".into()]);
        report.push_sweep_row(&SweepRow { size: 64, averages: vec![0.125] });
        let out = report.render().unwrap();
        assert_eq!(out, "matrix_size,v\n64,0.125000\n");
    }
}
