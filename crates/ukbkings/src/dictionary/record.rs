//! The per-field record carried through the pipeline.

use serde::{Deserialize, Serialize};

use super::anomaly::{Anomaly, AnomalyKind};
use super::coding::extract_coding_reference;
use super::naming::NameNormalizer;
use super::types::{SemanticType, classify};
use crate::input::DictionaryRow;

/// One field of the data dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    /// Source field code, e.g. `31-0.0`.
    pub raw_identifier: Option<String>,
    pub description: Option<String>,
    /// Type label as written in the dictionary.
    pub declared_type: Option<String>,
    /// Absent when the declared type is not in the vocabulary.
    pub semantic_type: Option<SemanticType>,
    /// Coding table id; empty when the description references none.
    pub coding_reference: String,
    /// Absent when the row has no field code or description.
    pub normalized_name: Option<String>,
}

impl FieldRecord {
    /// Create an underived record from the `UDI`, `Description` and `Type` cells.
    pub fn from_row(row: &DictionaryRow) -> Self {
        Self {
            raw_identifier: row.get("UDI").map(str::to_string),
            description: row.get("Description").map(str::to_string),
            declared_type: row.get("Type").map(str::to_string),
            semantic_type: None,
            coding_reference: String::new(),
            normalized_name: None,
        }
    }

    /// Set the semantic type from the declared type.
    pub fn classify(&mut self, row: usize) -> Option<Anomaly> {
        self.semantic_type = self.declared_type.as_deref().and_then(classify);

        if self.semantic_type.is_some() {
            return None;
        }

        let message = match &self.declared_type {
            Some(declared) => format!("unknown declared type '{}'", declared),
            None => "no declared type".to_string(),
        };
        Some(Anomaly::new(
            AnomalyKind::UnclassifiedType,
            row,
            self.raw_identifier.clone(),
            message,
        ))
    }

    /// Set the coding reference from the description.
    pub fn extract_coding(&mut self) {
        self.coding_reference = self
            .description
            .as_deref()
            .map(extract_coding_reference)
            .unwrap_or_default();
    }

    /// Set the normalized name from the description and field code.
    pub fn derive_name(&mut self, normalizer: &NameNormalizer, row: usize) -> Option<Anomaly> {
        match (&self.description, &self.raw_identifier) {
            (Some(description), Some(identifier)) => {
                self.normalized_name = Some(normalizer.normalize(description, identifier));
                None
            }
            _ => {
                self.normalized_name = None;
                Some(Anomaly::new(
                    AnomalyKind::MissingIdentifier,
                    row,
                    self.raw_identifier.clone(),
                    "no field code or description to derive a name from",
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary_row(udi: Option<&str>, description: Option<&str>, declared: Option<&str>) -> DictionaryRow {
        let mut row = DictionaryRow::default();
        row.set("UDI", udi.map(String::from));
        row.set("Count", Some("502".to_string()));
        row.set("Type", declared.map(String::from));
        row.set("Description", description.map(String::from));
        row
    }

    #[test]
    fn test_full_derivation() {
        let row = dictionary_row(
            Some("1647-0.0"),
            Some("Country of birth (UK/elsewhere) Uses data-coding 100420 simple list."),
            Some("Categorical (single)"),
        );
        let mut record = FieldRecord::from_row(&row);

        assert!(record.classify(0).is_none());
        record.extract_coding();
        assert!(record.derive_name(&NameNormalizer::new(), 0).is_none());

        assert_eq!(record.semantic_type, Some(SemanticType::Str));
        assert_eq!(record.coding_reference, "100420");
        assert_eq!(
            record.normalized_name.as_deref(),
            Some("country_of_birth_(uk/elsewhere)__f1647_0_0")
        );
    }

    #[test]
    fn test_unknown_type_is_kept_with_anomaly() {
        let row = dictionary_row(Some("99-0.0"), Some("Mystery"), Some("Boolean"));
        let mut record = FieldRecord::from_row(&row);

        let anomaly = record.classify(4).expect("anomaly");
        assert_eq!(anomaly.kind, AnomalyKind::UnclassifiedType);
        assert_eq!(anomaly.row, 4);
        assert_eq!(anomaly.field.as_deref(), Some("99-0.0"));
        assert!(record.semantic_type.is_none());
        assert_eq!(record.declared_type.as_deref(), Some("Boolean"));
    }

    #[test]
    fn test_missing_identifier_leaves_name_unset() {
        let row = dictionary_row(None, Some("Orphan"), Some("Text"));
        let mut record = FieldRecord::from_row(&row);

        let anomaly = record.derive_name(&NameNormalizer::new(), 0).expect("anomaly");
        assert_eq!(anomaly.kind, AnomalyKind::MissingIdentifier);
        assert!(record.normalized_name.is_none());
    }

    #[test]
    fn test_no_description_means_no_coding() {
        let row = dictionary_row(Some("1-0.0"), None, Some("Text"));
        let mut record = FieldRecord::from_row(&row);
        record.extract_coding();
        assert_eq!(record.coding_reference, "");
    }
}
