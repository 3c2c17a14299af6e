pub mod diff;
pub mod record;
pub mod registry;

pub use diff::{diff, DiffError, FieldChange};
pub use record::{ExtractionOutcome, ImageVariant, Record, StockStatus, Video, NONE};
pub use registry::{FieldSpec, StorageClass, FIELD_REGISTRY};
