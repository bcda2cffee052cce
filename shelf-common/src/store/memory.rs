//! In-memory record store
//!
//! Backs unit and integration tests, and serves as the reference
//! implementation of the store contract.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::record::BookRecord;
use crate::store::RecordStore;
use crate::Result;

/// HashMap-backed store behind a tokio RwLock
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, BookRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<BookRecord>> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, record: BookRecord) -> Result<()> {
        self.records.write().await.insert(key.to_string(), record);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.records.write().await.remove(key).is_some())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.records.read().await.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::BookFields;
    use crate::time;

    fn sample(isbn: &str) -> BookRecord {
        BookRecord::new(isbn.to_string(), BookFields::default(), time::now())
    }

    #[tokio::test]
    async fn test_set_get_delete_round_trip() {
        let store = MemoryStore::new();
        assert!(store.is_empty().await);

        store.set("9780156013987", sample("9780156013987")).await.unwrap();
        assert_eq!(store.len().await, 1);

        let fetched = store.get("9780156013987").await.unwrap();
        assert_eq!(fetched.unwrap().isbn, "9780156013987");

        assert!(store.delete("9780156013987").await.unwrap());
        assert!(!store.delete("9780156013987").await.unwrap());
        assert!(store.get("9780156013987").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_keys_lists_all_entries() {
        let store = MemoryStore::new();
        store.set("9780156013987", sample("9780156013987")).await.unwrap();
        store.set("9791032710839", sample("9791032710839")).await.unwrap();

        let mut keys = store.keys().await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["9780156013987", "9791032710839"]);
    }
}
