pub mod core;

// Re-export commonly used types
pub use self::core::error::QueueError;
pub use self::core::model::*;
pub use self::core::repository::QueueRepository;
