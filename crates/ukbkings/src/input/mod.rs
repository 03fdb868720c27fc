//! Dictionary document reading and table extraction.

mod extractor;
mod source;

pub use extractor::{ExtractorConfig, TableExtractor, forward_fill};
pub use source::{DictionaryRow, DictionaryTable, SourceEncoding, SourceMetadata};
