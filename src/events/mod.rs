pub mod normalizer;
pub mod record;

pub use normalizer::{Classification, EventNormalizer};
pub use record::{ActionKind, EventRecord, StoredRecord};
