//! Record store contract and implementations
//!
//! The reconciliation layer consumes exactly this key-value contract; each
//! environment implements it once (in-memory for tests, a flat shelf file
//! for the CLI, SQLite for the server — see `crate::db`). Stores persist
//! records verbatim; canonical-key policy and merge semantics live in
//! `crate::reconcile`, not here.

use async_trait::async_trait;

use crate::record::BookRecord;
use crate::Result;

pub mod memory;
pub mod shelf_file;

pub use memory::MemoryStore;
pub use shelf_file::ShelfFileStore;

/// Abstract book record store, keyed by canonical ISBN
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the record stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<BookRecord>>;

    /// Store `record` under `key`, replacing any previous entry
    async fn set(&self, key: &str, record: BookRecord) -> Result<()>;

    /// Remove the entry under `key`; returns true if a record existed
    async fn delete(&self, key: &str) -> Result<bool>;

    /// All keys currently present in the store
    async fn keys(&self) -> Result<Vec<String>>;
}
