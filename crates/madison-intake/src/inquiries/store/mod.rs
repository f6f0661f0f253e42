mod memory;
mod sqlite;

pub use memory::InMemoryInquiryStore;
pub use sqlite::SqliteInquiryStore;

use super::domain::{Inquiry, NewInquiry};

/// Persistence abstraction so the intake service can run against any backing store.
///
/// Implementations assign identifiers and creation timestamps; they never re-validate
/// input, which is the caller's job.
pub trait InquiryStore: Send + Sync {
    /// Persist a validated inquiry and return the stored record with generated fields.
    fn create(&self, inquiry: NewInquiry) -> Result<Inquiry, StoreError>;
    /// All stored inquiries in creation order.
    fn list(&self) -> Result<Vec<Inquiry>, StoreError>;
}

/// Error enumeration for persistence-layer failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("inquiry store unavailable: {0}")]
    Unavailable(String),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("migration error: {0}")]
    Migration(String),
    #[error("stored inquiry {id} is corrupt: {reason}")]
    Corrupt { id: i64, reason: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
