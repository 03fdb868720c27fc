//! Declared-type classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value type a field's data should be read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    /// Whole numbers.
    Int,
    /// Floating-point numbers.
    Float,
    /// Text, including categorical codes and dates.
    Str,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Int => "int",
            SemanticType::Float => "float",
            SemanticType::Str => "str",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type labels and the semantic type each maps to.
pub(crate) const TYPE_VOCABULARY: &[(&str, SemanticType)] = &[
    ("Sequence", SemanticType::Int),
    ("Integer", SemanticType::Int),
    ("Continuous", SemanticType::Float),
    ("Categorical (single)", SemanticType::Str),
    ("Categorical (multiple)", SemanticType::Str),
    ("Text", SemanticType::Str),
    ("Date", SemanticType::Str),
    ("Time", SemanticType::Str),
    ("Compound", SemanticType::Str),
    ("Binary object", SemanticType::Str),
    ("Curve", SemanticType::Str),
];

/// Map a declared type label to its semantic type.
///
/// Labels outside the vocabulary return `None`; matching is exact.
pub fn classify(declared_type: &str) -> Option<SemanticType> {
    TYPE_VOCABULARY
        .iter()
        .find(|(label, _)| *label == declared_type)
        .map(|(_, semantic)| *semantic)
}
