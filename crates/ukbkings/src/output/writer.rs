//! Tab-separated field-finder writer.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::dictionary::FieldRecord;
use crate::error::{MungeError, Result};

/// Column headers of the field-finder table.
pub const FIELD_FINDER_HEADER: [&str; 4] = ["field", "name", "categorical_coding", "ukb_type"];

/// Token written for missing values.
pub const MISSING_VALUE: &str = "NA";

/// Output path for a basket: `<out_dir>/<basket>_field_finder.txt`.
pub fn field_finder_path(out_dir: impl AsRef<Path>, basket: &str) -> PathBuf {
    out_dir.as_ref().join(format!("{}_field_finder.txt", basket))
}

/// Writes field records as a tab-separated lookup table.
pub struct FieldFinderWriter {
    path: PathBuf,
}

impl FieldFinderWriter {
    /// Create a writer targeting the basket's field-finder file in `out_dir`.
    pub fn new(out_dir: impl AsRef<Path>, basket: &str) -> Self {
        Self {
            path: field_finder_path(out_dir, basket),
        }
    }

    /// Create a writer targeting an explicit path.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write all records, header first. Returns the path written.
    ///
    /// The file is written in place; a failure part-way leaves a partial file.
    pub fn write(&self, records: &[FieldRecord]) -> Result<PathBuf> {
        let file = File::create(&self.path).map_err(|e| MungeError::WriteFailure {
            path: self.path.clone(),
            source: e,
        })?;

        self.write_to(file, records)?;

        debug!(path = %self.path.display(), rows = records.len(), "wrote field finder");
        Ok(self.path.clone())
    }

    /// Write all records to any writer.
    pub fn write_to<W: Write>(&self, out: W, records: &[FieldRecord]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(out);

        writer
            .write_record(FIELD_FINDER_HEADER)
            .map_err(|e| self.write_failure(e))?;

        for record in records {
            writer
                .write_record([
                    record.raw_identifier.as_deref().unwrap_or(MISSING_VALUE),
                    record.normalized_name.as_deref().unwrap_or(MISSING_VALUE),
                    record.coding_reference.as_str(),
                    record.declared_type.as_deref().unwrap_or(MISSING_VALUE),
                ])
                .map_err(|e| self.write_failure(e))?;
        }

        writer.flush().map_err(|e| MungeError::WriteFailure {
            path: self.path.clone(),
            source: e,
        })
    }

    fn write_failure(&self, err: csv::Error) -> MungeError {
        let source = match err.into_kind() {
            csv::ErrorKind::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, format!("{:?}", other)),
        };
        MungeError::WriteFailure {
            path: self.path.clone(),
            source,
        }
    }
}
