//! Flat-file record store
//!
//! Persists the whole shelf as one JSON object (key → record) and rewrites
//! it on every mutation. This is the locally persisted store used by the
//! CLI; shelf sizes are personal-library scale, so a full rewrite per write
//! is acceptable. Callers serialize concurrent writers (the CLI runs one
//! operation per invocation).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::record::BookRecord;
use crate::store::RecordStore;
use crate::Result;

/// JSON shelf file store
pub struct ShelfFileStore {
    path: PathBuf,
}

impl ShelfFileStore {
    /// Create a store over the given shelf file path.
    ///
    /// The file is created lazily on first write; a missing file reads as an
    /// empty shelf.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, BookRecord>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, records: &BTreeMap<String, BookRecord>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let contents = serde_json::to_string_pretty(records)?;
        tokio::fs::write(&self.path, contents).await?;
        debug!(path = %self.path.display(), records = records.len(), "Shelf file written");
        Ok(())
    }
}

#[async_trait]
impl RecordStore for ShelfFileStore {
    async fn get(&self, key: &str) -> Result<Option<BookRecord>> {
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, record: BookRecord) -> Result<()> {
        let mut records = self.load().await?;
        records.insert(key.to_string(), record);
        self.save(&records).await
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut records = self.load().await?;
        let existed = records.remove(key).is_some();
        if existed {
            self.save(&records).await?;
        }
        Ok(existed)
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.load().await?.into_keys().collect())
    }
}
