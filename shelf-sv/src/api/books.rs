//! Book record CRUD handlers
//!
//! All handlers validate ISBN input up front and go through the
//! reconciliation layer, so every write lands under the canonical key and
//! every read is variant-aware.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use shelf_common::reconcile::{find_by_any_variant, remove, upsert};
use shelf_common::store::RecordStore;
use shelf_common::{isbn, BookFields, BookRecord};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Manual contribution request: an identifier plus any subset of fields
#[derive(Debug, Deserialize)]
pub struct ContributeRequest {
    pub isbn: String,
    #[serde(flatten)]
    pub fields: BookFields,
}

/// Book list response
#[derive(Debug, Serialize)]
pub struct BookListResponse {
    pub total: usize,
    pub books: Vec<BookRecord>,
}

fn validated(raw: &str) -> ApiResult<String> {
    isbn::validate(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// GET /api/books
///
/// All cached records.
pub async fn list_books(State(state): State<AppState>) -> ApiResult<Json<BookListResponse>> {
    let keys = state.store.keys().await?;
    let mut books = Vec::with_capacity(keys.len());
    for key in keys {
        if let Some(record) = state.store.get(&key).await? {
            books.push(record);
        }
    }
    Ok(Json(BookListResponse {
        total: books.len(),
        books,
    }))
}

/// GET /api/books/:isbn
///
/// Variant-aware cache lookup; never touches external sources.
pub async fn get_book(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> ApiResult<Json<BookRecord>> {
    let cleaned = validated(&raw)?;
    match find_by_any_variant(&state.store, &cleaned).await? {
        Some((record, _)) => Ok(Json(record)),
        None => Err(ApiError::NotFound(format!("No record for ISBN {}", cleaned))),
    }
}

/// POST /api/books
///
/// Manual contribution: merge the supplied fields into whatever record
/// exists under any variant of the identifier.
pub async fn contribute_book(
    State(state): State<AppState>,
    Json(request): Json<ContributeRequest>,
) -> ApiResult<(StatusCode, Json<BookRecord>)> {
    let cleaned = validated(&request.isbn)?;

    let mut fields = request.fields;
    fields.source.get_or_insert_with(|| "manual".to_string());

    let record = upsert(&state.store, &cleaned, fields).await?;
    info!(isbn = %record.isbn, "Stored contributed record");
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/books/:isbn
///
/// Field edit; same merge-on-write path as contribution.
pub async fn update_book(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    Json(fields): Json<BookFields>,
) -> ApiResult<Json<BookRecord>> {
    let cleaned = validated(&raw)?;
    let record = upsert(&state.store, &cleaned, fields).await?;
    info!(isbn = %record.isbn, "Updated record");
    Ok(Json(record))
}

/// DELETE /api/books/:isbn
///
/// Variant-aware delete.
pub async fn delete_book(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> ApiResult<StatusCode> {
    let cleaned = validated(&raw)?;
    if remove(&state.store, &cleaned).await? {
        info!(isbn = %cleaned, "Deleted record");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("No record for ISBN {}", cleaned)))
    }
}
