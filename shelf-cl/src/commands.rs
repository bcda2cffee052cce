//! Shelf subcommand implementations
//!
//! All commands validate ISBN input up front and go through the
//! reconciliation layer against the local shelf file. `lookup` additionally
//! falls back to a running shelf-sv instance and caches whatever it returns.

use anyhow::{bail, Context, Result};
use tracing::debug;

use shelf_common::reconcile::{find_by_any_variant, remove, upsert};
use shelf_common::store::{RecordStore, ShelfFileStore};
use shelf_common::{isbn, BookFields, BookRecord};

use crate::server_client::ServerClient;

fn validated(raw: &str) -> Result<String> {
    isbn::validate(raw).with_context(|| format!("rejected ISBN input '{}'", raw))
}

fn print_record(record: &BookRecord) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

/// Look up a book: local shelf first, then the lookup server.
///
/// A server hit is merged into the local shelf so the next lookup is
/// offline-capable.
pub async fn lookup(
    store: &ShelfFileStore,
    server: Option<&ServerClient>,
    raw: &str,
) -> Result<()> {
    let cleaned = validated(raw)?;

    if let Some((record, matched_key)) = find_by_any_variant(store, &cleaned).await? {
        debug!(key = %matched_key, "Served from local shelf");
        return print_record(&record);
    }

    let Some(server) = server else {
        bail!("no local record for ISBN {} (offline)", cleaned);
    };

    match server.lookup(&cleaned).await? {
        Some(fetched) => {
            let cached = upsert(store, &cleaned, BookFields::from(&fetched)).await?;
            print_record(&cached)
        }
        None => bail!("no record for ISBN {} on the lookup server", cleaned),
    }
}

/// Merge manually supplied fields into the local shelf
pub async fn add(store: &ShelfFileStore, raw: &str, mut fields: BookFields) -> Result<()> {
    let cleaned = validated(raw)?;
    fields.source.get_or_insert_with(|| "manual".to_string());

    let record = upsert(store, &cleaned, fields).await?;
    print_record(&record)
}

/// Print one record from the local shelf
pub async fn show(store: &ShelfFileStore, raw: &str) -> Result<()> {
    let cleaned = validated(raw)?;
    match find_by_any_variant(store, &cleaned).await? {
        Some((record, _)) => print_record(&record),
        None => bail!("no local record for ISBN {}", cleaned),
    }
}

/// List the local shelf, one line per record
pub async fn ls(store: &ShelfFileStore) -> Result<()> {
    let keys = store.keys().await?;
    if keys.is_empty() {
        println!("(empty shelf)");
        return Ok(());
    }

    for key in keys {
        if let Some(record) = store.get(&key).await? {
            let title = record.title.as_deref().unwrap_or("(untitled)");
            match &record.authors {
                Some(authors) if !authors.is_empty() => {
                    println!("{}  {} — {}", record.isbn, title, authors.join(", "));
                }
                _ => println!("{}  {}", record.isbn, title),
            }
        }
    }
    Ok(())
}

/// Remove a record from the local shelf (variant-aware)
pub async fn rm(store: &ShelfFileStore, raw: &str) -> Result<()> {
    let cleaned = validated(raw)?;
    if remove(store, &cleaned).await? {
        println!("Removed {}", isbn::normalize(&cleaned));
        Ok(())
    } else {
        bail!("no local record for ISBN {}", cleaned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_fields(t: &str) -> BookFields {
        BookFields {
            title: Some(t.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_add_then_show_by_other_form() {
        let dir = tempfile::tempdir().unwrap();
        let store = ShelfFileStore::new(dir.path().join("shelf.json"));

        add(&store, "0156013987", title_fields("Le Petit Prince"))
            .await
            .unwrap();
        show(&store, "9780156013987").await.unwrap();
    }

    #[tokio::test]
    async fn test_add_tags_manual_source() {
        let dir = tempfile::tempdir().unwrap();
        let store = ShelfFileStore::new(dir.path().join("shelf.json"));

        add(&store, "9780156013987", title_fields("Le Petit Prince"))
            .await
            .unwrap();

        let (record, _) = find_by_any_variant(&store, "9780156013987")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.source.as_deref(), Some("manual"));
    }

    #[tokio::test]
    async fn test_lookup_offline_miss_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = ShelfFileStore::new(dir.path().join("shelf.json"));

        let result = lookup(&store, None, "9780156013987").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_rm_rejects_unknown_isbn() {
        let dir = tempfile::tempdir().unwrap();
        let store = ShelfFileStore::new(dir.path().join("shelf.json"));

        assert!(rm(&store, "9780156013987").await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_isbn_rejected_before_store_access() {
        let dir = tempfile::tempdir().unwrap();
        let store = ShelfFileStore::new(dir.path().join("shelf.json"));

        assert!(show(&store, "12345").await.is_err());
        assert!(add(&store, "not-an-isbn", BookFields::default()).await.is_err());
    }
}
