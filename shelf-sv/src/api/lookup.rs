//! Cache-or-fetch lookup handler
//!
//! The reconciliation layer never performs network I/O itself; this handler
//! fetches from external sources first and only then hands the fields to
//! `upsert`.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use shelf_common::reconcile::{find_by_any_variant, upsert};
use shelf_common::{isbn, BookRecord};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Lookup response: the record plus whether it was served from cache
#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub cached: bool,
    #[serde(flatten)]
    pub record: BookRecord,
}

/// GET /api/lookup/:isbn
///
/// Variant-aware cache lookup; on miss, probe external sources and merge
/// the fetched fields into the cache. 404 when no source knows the ISBN.
pub async fn lookup_book(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> ApiResult<Json<LookupResponse>> {
    let cleaned = isbn::validate(&raw).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if let Some((record, _)) = find_by_any_variant(&state.store, &cleaned).await? {
        return Ok(Json(LookupResponse {
            cached: true,
            record,
        }));
    }

    match state.resolver.resolve(&cleaned).await {
        Some(fields) => {
            let record = upsert(&state.store, &cleaned, fields).await?;
            info!(isbn = %record.isbn, source = record.source.as_deref().unwrap_or("unknown"),
                  "Cached record from external source");
            Ok(Json(LookupResponse {
                cached: false,
                record,
            }))
        }
        None => Err(ApiError::NotFound(format!(
            "No external source knows ISBN {}",
            cleaned
        ))),
    }
}
