//! Main Munger struct and public API.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

use crate::dictionary::{
    Anomaly, AnomalyKind, FieldRecord, NameNormalizer, resolve_duplicates,
};
use crate::error::Result;
use crate::input::{DictionaryTable, ExtractorConfig, SourceEncoding, SourceMetadata, TableExtractor};
use crate::output::FieldFinderWriter;

/// Configuration for a munging run.
#[derive(Debug, Clone, Default)]
pub struct MungerConfig {
    /// Table extraction configuration.
    pub extractor: ExtractorConfig,
}

impl MungerConfig {
    /// Decode the document with the given encoding.
    pub fn with_encoding(mut self, encoding: SourceEncoding) -> Self {
        self.extractor.encoding = encoding;
        self
    }
}

/// Result of munging a dictionary document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MungeResult {
    /// Metadata about the source document.
    pub source: SourceMetadata,
    /// Final field records, in table order.
    pub records: Vec<FieldRecord>,
    /// Per-field anomalies, in the order they were found.
    pub anomalies: Vec<Anomaly>,
    /// Path of the field-finder table written.
    pub output: PathBuf,
    pub summary: MungeSummary,
}

/// Summary counts for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MungeSummary {
    /// Rows written to the lookup table.
    pub total_fields: usize,
    /// Fields with a coding reference.
    pub coded_fields: usize,
    /// Fields whose declared type is unknown or missing.
    pub unclassified_fields: usize,
    /// Fields renamed with the duplicate prefix.
    pub duplicate_names: usize,
    /// Fields without a derivable name.
    pub missing_identifiers: usize,
    /// Field counts per semantic type, `unclassified` included.
    pub by_semantic_type: IndexMap<String, usize>,
}

impl MungeSummary {
    fn compute(records: &[FieldRecord], anomalies: &[Anomaly]) -> Self {
        let count = |kind: AnomalyKind| anomalies.iter().filter(|a| a.kind == kind).count();

        let mut by_semantic_type = IndexMap::new();
        for record in records {
            let key = record
                .semantic_type
                .map(|t| t.as_str())
                .unwrap_or("unclassified");
            *by_semantic_type.entry(key.to_string()).or_insert(0) += 1;
        }

        Self {
            total_fields: records.len(),
            coded_fields: records
                .iter()
                .filter(|r| !r.coding_reference.is_empty())
                .count(),
            unclassified_fields: count(AnomalyKind::UnclassifiedType),
            duplicate_names: count(AnomalyKind::DuplicateName),
            missing_identifiers: count(AnomalyKind::MissingIdentifier),
            by_semantic_type,
        }
    }
}

/// The field-dictionary munging engine.
pub struct Munger {
    extractor: TableExtractor,
    normalizer: NameNormalizer,
}

impl Munger {
    /// Create a Munger with default configuration.
    pub fn new() -> Self {
        Self::with_config(MungerConfig::default())
    }

    /// Create a Munger with custom configuration.
    pub fn with_config(config: MungerConfig) -> Self {
        Self {
            extractor: TableExtractor::with_config(config.extractor),
            normalizer: NameNormalizer::new(),
        }
    }

    /// Munge a dictionary document into `<out_dir>/<basket>_field_finder.txt`.
    ///
    /// Structural problems abort before anything is written. Per-field
    /// problems are returned as anomalies.
    pub fn munge(
        &self,
        html: impl AsRef<Path>,
        basket: &str,
        out_dir: impl AsRef<Path>,
    ) -> Result<MungeResult> {
        let html = html.as_ref();
        let span = info_span!("munge", basket, html = %html.display());
        let _guard = span.enter();

        let (table, source) = self.extractor.extract_file(html)?;
        info!(rows = table.row_count(), "field table extracted");

        let (records, anomalies) = self.derive_records(&table);

        let output = FieldFinderWriter::new(out_dir, basket).write(&records)?;
        let summary = MungeSummary::compute(&records, &anomalies);

        info!(
            fields = summary.total_fields,
            unclassified = summary.unclassified_fields,
            duplicates = summary.duplicate_names,
            output = %output.display(),
            "field-to-name table written"
        );

        Ok(MungeResult {
            source,
            records,
            anomalies,
            output,
            summary,
        })
    }

    /// Derive field records from an extracted table.
    ///
    /// Each record is classified, coded and named, then names are
    /// de-duplicated across the whole set.
    pub fn derive_records(&self, table: &DictionaryTable) -> (Vec<FieldRecord>, Vec<Anomaly>) {
        let mut anomalies = Vec::new();

        let mut records: Vec<FieldRecord> = table
            .rows
            .iter()
            .enumerate()
            .map(|(row, source_row)| {
                let mut record = FieldRecord::from_row(source_row);
                anomalies.extend(record.classify(row));
                record.extract_coding();
                anomalies.extend(record.derive_name(&self.normalizer, row));
                record
            })
            .collect();

        anomalies.extend(resolve_duplicates(&mut records));

        for anomaly in &anomalies {
            warn!(
                kind = anomaly.kind.label(),
                row = anomaly.row,
                field = anomaly.field.as_deref().unwrap_or("NA"),
                "{}",
                anomaly.message
            );
        }

        (records, anomalies)
    }
}

impl Default for Munger {
    fn default() -> Self {
        Self::new()
    }
}
