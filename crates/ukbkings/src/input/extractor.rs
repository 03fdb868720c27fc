//! HTML table extraction with forward-fill of merged cells.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::{DictionaryRow, DictionaryTable, SourceEncoding, SourceMetadata};
use crate::error::{MungeError, Result};

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());

/// A whitespace run containing a line break, or any run of two or more
/// whitespace characters.
static CELL_WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[\r\n]+\s*|\s{2,}").unwrap());

/// Extractor configuration.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Zero-based position of the field-metadata table among all tables.
    pub table_index: usize,
    /// Columns that must be present in the header row.
    pub required_columns: Vec<String>,
    /// Columns whose blank cells inherit the previous row's value.
    pub fill_columns: Vec<String>,
    /// Encoding of the document bytes.
    pub encoding: SourceEncoding,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            table_index: 1,
            required_columns: vec!["UDI".into(), "Description".into(), "Type".into()],
            fill_columns: vec!["UDI".into(), "Description".into()],
            encoding: SourceEncoding::Latin1,
        }
    }
}

/// Extracts the field-metadata table from a dictionary document.
pub struct TableExtractor {
    config: ExtractorConfig,
}

impl TableExtractor {
    /// Create an extractor with default configuration.
    pub fn new() -> Self {
        Self {
            config: ExtractorConfig::default(),
        }
    }

    /// Create an extractor with custom configuration.
    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Read a document from disk and extract its field table.
    pub fn extract_file(&self, path: impl AsRef<Path>) -> Result<(DictionaryTable, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| MungeError::SourceNotFound {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| MungeError::SourceNotFound {
                path: path.to_path_buf(),
                source: e,
            })?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let table = self.extract_bytes(&contents)?;

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            contents.len() as u64,
            self.config.encoding,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, metadata))
    }

    /// Extract the field table from raw document bytes.
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<DictionaryTable> {
        let text = self.config.encoding.decode(bytes);
        self.extract_html(&text)
    }

    /// Extract the field table from decoded document text.
    pub fn extract_html(&self, html: &str) -> Result<DictionaryTable> {
        let document = Html::parse_document(html);
        let tables: Vec<ElementRef> = document.select(&TABLE).collect();

        debug!(tables = tables.len(), "located table elements");

        let table = tables.get(self.config.table_index).ok_or_else(|| {
            MungeError::MalformedDocument(format!(
                "expected at least {} table elements, found {}",
                self.config.table_index + 1,
                tables.len()
            ))
        })?;

        let mut grid = expand_spans(*table).into_iter();
        let header = grid
            .next()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| MungeError::MalformedDocument("field table has no header row".into()))?;
        let header = header_names(header);

        for required in &self.config.required_columns {
            if !header[1..].iter().any(|h| h == required) {
                return Err(MungeError::MalformedDocument(format!(
                    "field table is missing the '{}' column",
                    required
                )));
            }
        }

        let index_name = header[0].clone();
        let headers: Vec<String> = header[1..].to_vec();

        let mut rows: Vec<DictionaryRow> = grid
            .map(|cells| build_row(&headers, cells))
            .collect();

        for column in &self.config.fill_columns {
            forward_fill(&mut rows, column);
        }

        debug!(rows = rows.len(), columns = header.len(), "extracted field table");

        Ok(DictionaryTable::new(index_name, headers, rows))
    }
}

impl Default for TableExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Fill blank cells of `column` with the nearest preceding non-blank value.
///
/// Rows before the first non-blank value stay blank.
pub fn forward_fill(rows: &mut [DictionaryRow], column: &str) {
    let mut carry: Option<String> = None;

    for row in rows.iter_mut() {
        match row.get(column) {
            Some(value) => carry = Some(value.to_string()),
            None => {
                if carry.is_some() {
                    row.set(column, carry.clone());
                }
            }
        }
    }
}

/// Header labels with blanks named by position and repeats suffixed `.1`, `.2`, ...
fn header_names(cells: Vec<Option<String>>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    cells
        .into_iter()
        .enumerate()
        .map(|(i, h)| {
            let name = h.unwrap_or_else(|| format!("Unnamed: {}", i));
            let count = seen.entry(name.clone()).or_insert(0);
            let label = if *count == 0 {
                name
            } else {
                format!("{}.{}", name, count)
            };
            *count += 1;
            label
        })
        .collect()
}

/// Pair a row's cells with the headers. Short rows are padded, long rows truncated.
fn build_row(headers: &[String], cells: Vec<Option<String>>) -> DictionaryRow {
    let mut cells = cells.into_iter();
    let index = cells.next().flatten();

    let mut map = IndexMap::with_capacity(headers.len());
    for header in headers {
        map.insert(header.clone(), cells.next().flatten());
    }

    DictionaryRow { index, cells: map }
}

/// Lay the table's rows out as a grid, replicating `rowspan`/`colspan` cells
/// into every position they cover.
fn expand_spans(table: ElementRef) -> Vec<Vec<Option<String>>> {
    let mut grid = Vec::new();
    // (column, text, rows still to cover)
    let mut pending: Vec<(usize, Option<String>, usize)> = Vec::new();

    for tr in own_rows(table) {
        let mut texts = Vec::new();
        let mut next_pending = Vec::new();
        let mut carried = pending.into_iter().peekable();
        let mut column = 0;

        for cell in tr
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|e| matches!(e.value().name(), "td" | "th"))
        {
            while let Some((_, text, left)) = carried.next_if(|(c, _, _)| *c <= column) {
                texts.push(text.clone());
                if left > 1 {
                    next_pending.push((column, text, left - 1));
                }
                column += 1;
            }

            let text = cell_text(cell);
            let rowspan = span(cell, "rowspan");
            let colspan = span(cell, "colspan");

            for _ in 0..colspan {
                texts.push(text.clone());
                if rowspan > 1 {
                    next_pending.push((column, text.clone(), rowspan - 1));
                }
                column += 1;
            }
        }

        for (_, text, left) in carried {
            texts.push(text.clone());
            if left > 1 {
                next_pending.push((column, text, left - 1));
            }
            column += 1;
        }

        grid.push(texts);
        pending = next_pending;
    }

    grid
}

/// Rows belonging to this table, excluding rows of nested tables.
fn own_rows<'a>(table: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    let table_id = table.id();
    table
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "tr")
        .filter(move |tr| {
            tr.ancestors()
                .filter_map(ElementRef::wrap)
                .find(|a| a.value().name() == "table")
                .map(|a| a.id())
                == Some(table_id)
        })
}

/// Whitespace-normalized cell text; blank cells are `None`.
fn cell_text(cell: ElementRef) -> Option<String> {
    let raw: String = cell.text().collect();
    let text = CELL_WHITESPACE.replace_all(&raw, " ");
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn span(cell: ElementRef, attr: &str) -> usize {
    cell.value()
        .attr(attr)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tables(body: &str) -> String {
        format!(
            "<html><body><table><tr><td>summary</td></tr></table>\
             <table><tr><th>Column</th><th>UDI</th><th>Count</th><th>Type</th><th>Description</th></tr>\
             {}</table></body></html>",
            body
        )
    }

    fn row(values: &[&str]) -> DictionaryRow {
        let mut row = DictionaryRow::default();
        for (i, v) in values.iter().enumerate() {
            let value = if v.is_empty() { None } else { Some(v.to_string()) };
            row.set(&format!("c{}", i), value);
        }
        row
    }

    #[test]
    fn test_extracts_second_table() {
        let html = two_tables(
            "<tr><td>0</td><td>eid</td><td>10</td><td>Sequence</td><td>Encoded anonymised participant ID</td></tr>\
             <tr><td>1</td><td>31-0.0</td><td>10</td><td>Categorical (single)</td><td>Sex</td></tr>",
        );

        let table = TableExtractor::new().extract_html(&html).unwrap();

        assert_eq!(table.index_name, "Column");
        assert_eq!(table.headers, vec!["UDI", "Count", "Type", "Description"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0].index.as_deref(), Some("0"));
        assert_eq!(table.rows[1].get("UDI"), Some("31-0.0"));
        assert_eq!(table.rows[1].get("Type"), Some("Categorical (single)"));
    }

    #[test]
    fn test_single_table_is_malformed() {
        let html = "<table><tr><th>Column</th><th>UDI</th></tr></table>";
        let err = TableExtractor::new().extract_html(html).unwrap_err();
        assert!(matches!(err, MungeError::MalformedDocument(_)));
    }

    #[test]
    fn test_missing_required_column_is_malformed() {
        let html = "<table></table><table><tr><th>Column</th><th>UDI</th><th>Type</th></tr>\
                    <tr><td>0</td><td>eid</td><td>Sequence</td></tr></table>";
        let err = TableExtractor::new().extract_html(html).unwrap_err();
        match err {
            MungeError::MalformedDocument(msg) => assert!(msg.contains("Description")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cell_whitespace_is_normalized() {
        let html = two_tables(
            "<tr><td>1</td><td>  31-0.0 </td><td>1</td><td>Categorical (single)</td>\
             <td>Sex\n   of participant</td></tr>",
        );

        let table = TableExtractor::new().extract_html(&html).unwrap();
        assert_eq!(table.rows[0].get("UDI"), Some("31-0.0"));
        assert_eq!(table.rows[0].get("Description"), Some("Sex of participant"));
    }

    #[test]
    fn test_rowspan_cells_are_replicated() {
        let html = two_tables(
            "<tr><td>1</td><td rowspan=\"2\">20002-0.0</td><td>5</td><td>Categorical (multiple)</td>\
             <td rowspan=\"2\">Non-cancer illness code</td></tr>\
             <tr><td>2</td><td>5</td><td>Categorical (multiple)</td></tr>",
        );

        let table = TableExtractor::new().extract_html(&html).unwrap();
        assert_eq!(table.rows[1].index.as_deref(), Some("2"));
        assert_eq!(table.rows[1].get("UDI"), Some("20002-0.0"));
        assert_eq!(table.rows[1].get("Count"), Some("5"));
        assert_eq!(table.rows[1].get("Description"), Some("Non-cancer illness code"));
    }

    #[test]
    fn test_colspan_cells_are_replicated() {
        let html = two_tables("<tr><td>1</td><td>3-0.0</td><td colspan=\"2\">Integer</td><td>Time</td></tr>");

        let table = TableExtractor::new().extract_html(&html).unwrap();
        assert_eq!(table.rows[0].get("Count"), Some("Integer"));
        assert_eq!(table.rows[0].get("Type"), Some("Integer"));
        assert_eq!(table.rows[0].get("Description"), Some("Time"));
    }

    #[test]
    fn test_blank_continuation_rows_are_filled() {
        let html = two_tables(
            "<tr><td>1</td><td>41270-0.0</td><td>9</td><td>Categorical (multiple)</td><td>Diagnoses ICD10</td></tr>\
             <tr><td>2</td><td></td><td>9</td><td>Categorical (multiple)</td><td></td></tr>\
             <tr><td>3</td><td></td><td>9</td><td>Categorical (multiple)</td><td></td></tr>",
        );

        let table = TableExtractor::new().extract_html(&html).unwrap();
        for row in &table.rows {
            assert_eq!(row.get("UDI"), Some("41270-0.0"));
            assert_eq!(row.get("Description"), Some("Diagnoses ICD10"));
        }
    }

    #[test]
    fn test_forward_fill_carry() {
        let mut rows = vec![row(&[""]), row(&["a"]), row(&[""]), row(&["b"]), row(&[""])];
        forward_fill(&mut rows, "c0");

        let values: Vec<Option<&str>> = rows.iter().map(|r| r.get("c0")).collect();
        assert_eq!(values, vec![None, Some("a"), Some("a"), Some("b"), Some("b")]);
    }

    #[test]
    fn test_forward_fill_only_touches_named_column() {
        let mut rows = vec![row(&["a", "x"]), row(&["", ""])];
        forward_fill(&mut rows, "c0");

        assert_eq!(rows[1].get("c0"), Some("a"));
        assert_eq!(rows[1].get("c1"), None);
    }

    #[test]
    fn test_nested_table_rows_are_ignored() {
        let html = two_tables(
            "<tr><td>1</td><td>31-0.0</td><td>1</td><td>Categorical (single)</td>\
             <td>Sex<table><tr><td>nested</td></tr></table></td></tr>",
        );

        let table = TableExtractor::new().extract_html(&html).unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_whitespace_around_line_breaks_collapses() {
        let html = two_tables(
            "<tr><td>1</td><td>31-0.0</td><td>1</td><td>Categorical (single)</td>\
             <td>Sex  \r\n\t of\tparticipant</td></tr>",
        );

        let table = TableExtractor::new().extract_html(&html).unwrap();
        assert_eq!(table.rows[0].get("Description"), Some("Sex of\tparticipant"));
    }

    #[test]
    fn test_required_column_in_index_position_is_malformed() {
        let html = "<table></table><table>\
                    <tr><th>UDI</th><th>Count</th><th>Type</th><th>Description</th></tr>\
                    <tr><td>31-0.0</td><td>1</td><td>Categorical (single)</td><td>Sex</td></tr></table>";
        let err = TableExtractor::new().extract_html(html).unwrap_err();
        match err {
            MungeError::MalformedDocument(msg) => assert!(msg.contains("UDI")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_repeated_headers_are_suffixed() {
        let html = "<table></table><table>\
                    <tr><th>Column</th><th>UDI</th><th>Type</th><th>Description</th><th>Description</th><th></th></tr>\
                    <tr><td>1</td><td>31-0.0</td><td>Categorical (single)</td><td>Sex</td><td>Notes</td><td>x</td></tr></table>";

        let table = TableExtractor::new().extract_html(html).unwrap();
        assert_eq!(
            table.headers,
            vec!["UDI", "Type", "Description", "Description.1", "Unnamed: 5"]
        );
        assert_eq!(table.rows[0].get("Description"), Some("Sex"));
        assert_eq!(table.rows[0].get("Description.1"), Some("Notes"));
    }
}
