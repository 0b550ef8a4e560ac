pub mod backend;
pub mod error;
pub mod retry;
mod store;

// Re-export commonly used types
pub use backend::{BlobBackend, HttpBackend, LocalFsBackend};
pub use error::BlobError;
pub use retry::RetryPolicy;
pub use store::BlobStore;
