//! Dictionary source metadata and the extracted field table.

use std::borrow::Cow;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Text encoding of the dictionary document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceEncoding {
    /// ISO-8859-1, the encoding the showcase exports are written in.
    #[default]
    Latin1,
    /// UTF-8, malformed sequences replaced.
    Utf8,
}

impl SourceEncoding {
    /// Decode raw document bytes into text.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        match self {
            SourceEncoding::Latin1 => encoding_rs::mem::decode_latin1(bytes),
            SourceEncoding::Utf8 => encoding_rs::UTF_8.decode_with_bom_removal(bytes).0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SourceEncoding::Latin1 => "iso-8859-1",
            SourceEncoding::Utf8 => "utf-8",
        }
    }
}

/// Metadata about the dictionary document that was munged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Encoding used to decode the document.
    pub encoding: String,
    /// Number of field rows in the metadata table (excluding header).
    pub row_count: usize,
    /// Number of columns in the metadata table, index column included.
    pub column_count: usize,
    /// When the extraction was performed.
    pub extracted_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a document that has been extracted.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        encoding: SourceEncoding,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            encoding: encoding.label().to_string(),
            row_count,
            column_count,
            extracted_at: Utc::now(),
        }
    }
}

/// One row of the field-metadata table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionaryRow {
    /// Value of the first (index) column.
    pub index: Option<String>,
    /// Remaining cells keyed by header, in column order. `None` is a blank cell.
    pub cells: IndexMap<String, Option<String>>,
}

impl DictionaryRow {
    /// Get a cell value by column name. Blank and absent cells are `None`.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).and_then(|v| v.as_deref())
    }

    /// Set a cell value, keeping the column position if it already exists.
    pub fn set(&mut self, column: &str, value: Option<String>) {
        self.cells.insert(column.to_string(), value);
    }
}

/// The field-metadata table extracted from a dictionary document.
#[derive(Debug, Clone)]
pub struct DictionaryTable {
    /// Header of the index column.
    pub index_name: String,
    /// Headers of the remaining columns.
    pub headers: Vec<String>,
    /// Rows in document order.
    pub rows: Vec<DictionaryRow>,
}

impl DictionaryTable {
    pub fn new(index_name: String, headers: Vec<String>, rows: Vec<DictionaryRow>) -> Self {
        Self {
            index_name,
            headers,
            rows,
        }
    }

    /// Get the number of columns, index column included.
    pub fn column_count(&self) -> usize {
        self.headers.len() + 1
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
