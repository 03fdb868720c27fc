//! ukbkings: field-dictionary munging for biobank data baskets.
//!
//! A basket ships with an HTML data dictionary listing every field, its
//! description and its declared type. This crate turns that document into a
//! field-finder lookup table: one row per field mapping the raw field code to a
//! sanitized variable name, its categorical coding and its declared type.
//!
//! # Pipeline
//!
//! - **Extract**: the second `<table>` of the document, forward-filled
//! - **Classify**: declared type to `int`, `float` or `str`
//! - **Code**: `data-coding <n>` references pulled out of descriptions
//! - **Name**: ordered rewrite rules, then the `eid` override
//! - **Resolve**: later collisions get a `duplicate_` prefix
//! - **Write**: `<out_dir>/<basket>_field_finder.txt`, tab separated
//!
//! # Example
//!
//! ```no_run
//! use ukbkings::Munger;
//!
//! let munger = Munger::new();
//! let result = munger.munge("ukb12345.html", "ukb12345", "./").unwrap();
//!
//! println!("Fields: {}", result.records.len());
//! println!("Written to: {}", result.output.display());
//! ```

pub mod dictionary;
pub mod error;
pub mod input;
pub mod link;
pub mod output;

mod munger;

pub use crate::munger::{MungeResult, MungeSummary, Munger, MungerConfig};
pub use dictionary::{Anomaly, AnomalyKind, FieldRecord, SemanticType};
pub use error::{MungeError, Result};
pub use input::{DictionaryTable, SourceEncoding, SourceMetadata, TableExtractor};
pub use link::{LinkAction, LinkConfig, LinkPlan};
pub use output::FieldFinderWriter;
