//! Key-value storage facade
//!
//! The facade stores raw strings under string keys. Encoding records as JSON is
//! the [`RecordStore`](crate::RecordStore)'s job, not the backend's.
//!
//! Implementations:
//! - [`MemoryStorage`] for tests and embedding
//! - [`FileStorage`] for a directory on disk, one file per key

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use anyhow::Result;

/// Flat string-to-string persistence backend
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`. Returns `None` if not found.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing anything stored there.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}
