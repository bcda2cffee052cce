//! Record reconciliation: variant-aware lookup and merge-on-write
//!
//! A record may have been persisted under either ISBN form depending on its
//! provenance (manually entered vs. fetched from a source that returned one
//! form). Lookup is therefore format-agnostic, while every write re-homes
//! the record under its canonical ISBN-13 key so equivalent identifiers
//! never produce duplicate entries.
//!
//! Each operation is one read-modify-write against the store and takes no
//! locks of its own; the surrounding store or caller serializes concurrent
//! writers per key. Store I/O errors propagate unretried.

use tracing::debug;

use crate::isbn;
use crate::record::{BookFields, BookRecord};
use crate::store::RecordStore;
use crate::{time, Result};

/// Probe the store for each identifier variant in order; return the first
/// hit together with the exact key it was found under.
pub async fn find_by_any_variant<S>(store: &S, raw: &str) -> Result<Option<(BookRecord, String)>>
where
    S: RecordStore + ?Sized,
{
    for key in isbn::variants(raw) {
        if let Some(record) = store.get(&key).await? {
            return Ok(Some((record, key)));
        }
    }
    Ok(None)
}

/// Merge incoming fields into whatever record exists under any variant of
/// `raw`, then persist the result under the canonical key.
///
/// Incoming fields win per field; absent incoming fields are preserved.
/// `created_at` survives from the existing record; `updated_at` is always
/// refreshed. If the existing record was stored under a non-canonical key
/// (e.g. its ISBN-10 form), that entry is removed.
pub async fn upsert<S>(store: &S, raw: &str, incoming: BookFields) -> Result<BookRecord>
where
    S: RecordStore + ?Sized,
{
    let canonical = isbn::normalize(raw);

    let record = match find_by_any_variant(store, raw).await? {
        Some((mut existing, matched_key)) => {
            existing.apply(incoming);
            existing.isbn = canonical.clone();
            existing.updated_at = time::now();

            if matched_key != canonical {
                // Re-home the record: one entry per equivalence class
                store.delete(&matched_key).await?;
                debug!(old_key = %matched_key, new_key = %canonical, "Record re-homed to canonical key");
            }
            existing
        }
        None => BookRecord::new(canonical.clone(), incoming, time::now()),
    };

    store.set(&canonical, record.clone()).await?;
    Ok(record)
}

/// Variant-aware delete: removes the record under whichever variant key it
/// is stored. Returns true if a record existed.
pub async fn remove<S>(store: &S, raw: &str) -> Result<bool>
where
    S: RecordStore + ?Sized,
{
    match find_by_any_variant(store, raw).await? {
        Some((_, matched_key)) => store.delete(&matched_key).await,
        None => Ok(false),
    }
}
