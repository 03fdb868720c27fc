//! Name-collision resolution across the whole field set.

use std::collections::HashSet;

use super::anomaly::{Anomaly, AnomalyKind};
use super::record::FieldRecord;

/// Prefix given to every repeat of an already-used name.
pub const DUPLICATE_PREFIX: &str = "duplicate_";

/// Prefix repeated names with [`DUPLICATE_PREFIX`], in row order.
///
/// The first occurrence keeps its name. Every later occurrence gets a single
/// prefix, so a name seen three times yields two identical `duplicate_` names.
/// Records without a name are skipped.
pub fn resolve_duplicates(records: &mut [FieldRecord]) -> Vec<Anomaly> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    let mut anomalies = Vec::new();

    for (row, record) in records.iter_mut().enumerate() {
        let Some(name) = record.normalized_name.as_mut() else {
            continue;
        };

        if seen.insert(name.clone()) {
            continue;
        }

        let renamed = format!("{}{}", DUPLICATE_PREFIX, name);
        anomalies.push(Anomaly::new(
            AnomalyKind::DuplicateName,
            row,
            record.raw_identifier.clone(),
            format!("'{}' already used, renamed to '{}'", name, renamed),
        ));
        *name = renamed;
    }

    anomalies
}
