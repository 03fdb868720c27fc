//! Per-field derivations: type, coding reference, name and de-duplication.

mod anomaly;
mod coding;
mod duplicates;
mod naming;
mod record;
mod types;

pub use anomaly::{Anomaly, AnomalyKind};
pub use coding::extract_coding_reference;
pub use duplicates::{DUPLICATE_PREFIX, resolve_duplicates};
pub use naming::{NameNormalizer, NameRule, PARTICIPANT_ID_NAME, normalize_name};
pub use record::FieldRecord;
pub use types::{SemanticType, classify};
