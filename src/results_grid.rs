use crate::core::db::value::Row;
use crate::core::{PgTablesError, Result};

/// Results Grid Module
///
/// Renders a header row plus data rows as column-aligned plain text, and
/// assembles per-table renderings into a whole-catalog dump.

use std::collections::BTreeMap;

/// Separator placed between cells of one line.
pub const COLUMN_GAP: &str = "  ";

/// Extra dashes after the longest table name in catalog section headers.
pub const HEADER_MARGIN: usize = 4;

/// Catalog rendering when there are no tables.
pub const EMPTY_CATALOG: &str = "empty";

/// A header row and data rows, already stringified.
#[derive(Debug, Clone, Default)]
pub struct ResultsGrid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultsGrid {
    /// Creates a new, empty ResultsGrid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a grid from column names and result rows, stringifying each
    /// value with its `Display` form.
    pub fn from_rows(columns: Vec<String>, rows: &[Row]) -> Self {
        ResultsGrid {
            headers: columns,
            rows: rows
                .iter()
                .map(|row| row.iter().map(ToString::to_string).collect())
                .collect(),
        }
    }

    /// Sets the headers for the grid.
    pub fn set_headers(&mut self, headers: Vec<String>) {
        self.headers = headers;
    }

    /// Adds a row to the grid. Each row is represented as a vector of strings.
    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn lines(&self) -> impl Iterator<Item = &Vec<String>> {
        std::iter::once(&self.headers).chain(self.rows.iter())
    }

    /// Widest cell per column position, header included. Rows may be
    /// ragged; a position only counts the rows that reach it.
    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = Vec::new();
        for line in self.lines() {
            for (i, cell) in line.iter().enumerate() {
                let width = cell.chars().count();
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(width),
                    None => widths.push(width),
                }
            }
        }
        widths
    }

    /// Renders the grid: every cell left-justified to its column width,
    /// cells joined by two spaces, lines joined by newlines. No trailing
    /// newline.
    pub fn render(&self) -> String {
        let widths = self.column_widths();
        self.lines()
            .map(|line| {
                line.iter()
                    .zip(&widths)
                    .map(|(cell, width)| pad_right(cell, *width, ' '))
                    .collect::<Vec<_>>()
                    .join(COLUMN_GAP)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Exports the grid data to a specified format.
    /// Supported formats: CSV, JSON.
    pub fn export(&self, format: &str) -> Result<String> {
        match format.to_lowercase().as_str() {
            "csv" => Ok(self.export_to_csv()),
            "json" => self.export_to_json(),
            _ => Err(PgTablesError::Config(format!(
                "Unsupported export format: '{}'. Supported formats: csv, json",
                format
            ))),
        }
    }

    fn export_to_csv(&self) -> String {
        let mut output = String::new();
        for line in self.lines() {
            let fields: Vec<String> = line.iter().map(|f| csv_field(f)).collect();
            output.push_str(&fields.join(","));
            output.push('\n');
        }
        output
    }

    fn export_to_json(&self) -> Result<String> {
        let mut rows = Vec::new();
        for row in &self.rows {
            let mut row_map = BTreeMap::new();
            for (i, cell) in row.iter().enumerate() {
                if let Some(header) = self.headers.get(i) {
                    row_map.insert(header.clone(), cell.clone());
                }
            }
            rows.push(row_map);
        }
        Ok(serde_json::to_string(&rows)?)
    }
}

fn pad_right(text: &str, width: usize, fill: char) -> String {
    let len = text.chars().count();
    let mut out = String::with_capacity(width.max(len));
    out.push_str(text);
    out.extend(std::iter::repeat(fill).take(width.saturating_sub(len)));
    out
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Joins per-table renderings into one catalog dump.
///
/// Each section starts with `-` and the table name, padded with dashes to
/// the longest name plus `HEADER_MARGIN`, followed by the table's own
/// rendering. Returns `EMPTY_CATALOG` when there are no sections.
pub fn render_catalog(sections: &[(String, String)]) -> String {
    if sections.is_empty() {
        return EMPTY_CATALOG.to_string();
    }
    let width = sections
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0)
        + HEADER_MARGIN;

    sections
        .iter()
        .map(|(name, body)| format!("-{}\n{}", pad_right(name, width, '-'), body))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::db::value::Value;

    #[test]
    fn test_render_header_only() {
        let mut grid = ResultsGrid::new();
        grid.set_headers(vec!["id".to_string(), "name".to_string()]);
        assert_eq!(grid.render(), "id  name");
    }

    #[test]
    fn test_render_pads_to_widest_cell() {
        let mut grid = ResultsGrid::new();
        grid.set_headers(vec!["id".to_string(), "name".to_string()]);
        grid.add_row(vec!["1".to_string(), "Alice".to_string()]);
        grid.add_row(vec!["100".to_string(), "Bob".to_string()]);
        assert_eq!(grid.render(), "id   name \n1    Alice\n100  Bob  ");
    }

    #[test]
    fn test_from_rows_stringifies_values() {
        let rows = vec![vec![Value::Int(1), Value::Null]];
        let grid = ResultsGrid::from_rows(vec!["id".into(), "note".into()], &rows);
        assert_eq!(grid.rows, vec![vec!["1".to_string(), "NULL".to_string()]]);
    }

    #[test]
    fn test_column_widths_count_chars_not_bytes() {
        let mut grid = ResultsGrid::new();
        grid.set_headers(vec!["n".to_string()]);
        grid.add_row(vec!["héllo".to_string()]);
        assert_eq!(grid.column_widths(), vec![5]);
    }

    #[test]
    fn test_ragged_rows() {
        let mut grid = ResultsGrid::new();
        grid.set_headers(vec!["a".to_string()]);
        grid.add_row(vec!["x".to_string(), "long".to_string()]);
        assert_eq!(grid.column_widths(), vec![1, 4]);
        assert_eq!(grid.render(), "a\nx  long");
    }

    #[test]
    fn test_export_csv_quotes_when_needed() {
        let mut grid = ResultsGrid::new();
        grid.set_headers(vec!["id".to_string(), "note".to_string()]);
        grid.add_row(vec!["1".to_string(), "a,b".to_string()]);
        assert_eq!(grid.export("csv").unwrap(), "id,note\n1,\"a,b\"\n");
    }

    #[test]
    fn test_export_json() {
        let mut grid = ResultsGrid::new();
        grid.set_headers(vec!["id".to_string(), "name".to_string()]);
        grid.add_row(vec!["1".to_string(), "Alice".to_string()]);
        assert_eq!(grid.export("JSON").unwrap(), r#"[{"id":"1","name":"Alice"}]"#);
    }

    #[test]
    fn test_export_unsupported_format() {
        assert!(matches!(grid_err("xml"), PgTablesError::Config(msg) if msg.contains("xml")));
    }

    fn grid_err(format: &str) -> PgTablesError {
        ResultsGrid::new().export(format).unwrap_err()
    }

    #[test]
    fn test_render_catalog_empty() {
        assert_eq!(render_catalog(&[]), "empty");
    }

    #[test]
    fn test_render_catalog_headers() {
        let sections = vec![
            ("public.t1".to_string(), "id\n1 ".to_string()),
            ("public.long".to_string(), "x".to_string()),
        ];
        let rendered = render_catalog(&sections);
        assert_eq!(
            rendered,
            "-public.t1------\nid\n1 \n-public.long----\nx"
        );
    }
}
