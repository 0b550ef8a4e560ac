pub mod error;
pub mod hash;
pub mod metas;
mod store;

// Re-export commonly used types
pub use error::DataStoreError;
pub use hash::content_hash;
pub use metas::{derive_metas, TASK_MAPPING};
pub use store::{DataStore, IngestReport, DEFAULT_MODEL_CONFIG};
