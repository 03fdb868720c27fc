//! Lookup-table output.

mod writer;

pub use writer::{FIELD_FINDER_HEADER, FieldFinderWriter, MISSING_VALUE, field_finder_path};
