//! Non-fatal data-quality signals raised while munging.

use serde::{Deserialize, Serialize};

/// Kind of anomaly found on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Declared type outside the known vocabulary; semantic type left unset.
    UnclassifiedType,
    /// Name collided with an earlier field and was prefixed.
    DuplicateName,
    /// Row had no field code or description to derive a name from.
    MissingIdentifier,
}

impl AnomalyKind {
    /// Get a human-readable label for the anomaly kind.
    pub fn label(&self) -> &'static str {
        match self {
            AnomalyKind::UnclassifiedType => "Unclassified Type",
            AnomalyKind::DuplicateName => "Duplicate Name",
            AnomalyKind::MissingIdentifier => "Missing Identifier",
        }
    }
}

/// A per-field anomaly, recorded inline rather than failing the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    /// Zero-based row position in the field table.
    pub row: usize,
    /// Raw field code, when the row has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl Anomaly {
    pub fn new(
        kind: AnomalyKind,
        row: usize,
        field: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            row,
            field,
            message: message.into(),
        }
    }
}
