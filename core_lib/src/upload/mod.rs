//! Multipart upload pipeline: field policy, type filter, disk persistence.

pub mod collector;
pub mod models;
pub mod policy;
pub mod storage;

pub use collector::collect_uploads;
pub use models::{UploadRequestBody, UploadSet, UploadedFile};
pub use policy::{FieldLimit, FieldPolicy};
pub use storage::UploadStore;
