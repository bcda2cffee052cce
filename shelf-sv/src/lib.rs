//! shelf-sv library - ISBN lookup server
//!
//! Serves the book record API over the SQLite-backed store, fetching
//! bibliographic metadata from external sources on cache miss.

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use shelf_common::db::SqliteStore;

pub mod api;
pub mod error;
pub mod services;

pub use error::{ApiError, ApiResult};

use services::MetadataResolver;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Record store backing the cache
    pub store: SqliteStore,
    /// External bibliographic sources, probed on cache miss
    pub resolver: Arc<MetadataResolver>,
}

impl AppState {
    /// Create new application state
    pub fn new(store: SqliteStore, resolver: Arc<MetadataResolver>) -> Self {
        Self { store, resolver }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/api/books", get(api::list_books).post(api::contribute_book))
        .route(
            "/api/books/:isbn",
            get(api::get_book).put(api::update_book).delete(api::delete_book),
        )
        .route("/api/lookup/:isbn", get(api::lookup_book))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
