//! Integration tests for the shelf-sv API
//!
//! Each test runs against a fresh tempfile-backed database and a resolver
//! with no external sources, so nothing here touches the network.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

use shelf_common::db::{init_database, SqliteStore};
use shelf_sv::services::MetadataResolver;
use shelf_sv::{build_router, AppState};

/// Test helper: app over a fresh database, no external sources.
///
/// The TempDir guard must stay alive as long as the app.
async fn setup_app() -> (axum::Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let pool = init_database(&dir.path().join("shelf.db"))
        .await
        .expect("Should initialize database");

    let state = AppState::new(
        SqliteStore::new(pool),
        Arc::new(MetadataResolver::with_sources(vec![])),
    );
    (build_router(state), dir)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _guard) = setup_app().await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "shelf-sv");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_contribute_then_get_by_either_form() {
    let (app, _guard) = setup_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/books",
            json!({"isbn": "0156013987", "title": "Le Petit Prince"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["isbn"], "9780156013987");
    assert_eq!(body["title"], "Le Petit Prince");
    assert_eq!(body["source"], "manual");

    // Lookup by the canonical form and by the contributed ISBN-10 form
    for uri in ["/api/books/9780156013987", "/api/books/0156013987"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = extract_json(response.into_body()).await;
        assert_eq!(body["isbn"], "9780156013987");
    }
}

#[tokio::test]
async fn test_contribute_rejects_invalid_isbn() {
    let (app, _guard) = setup_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/books",
            json!({"isbn": "12345", "title": "Too Short"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_equivalent_contributions_merge_into_one_record() {
    let (app, _guard) = setup_app().await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/books",
            json!({"isbn": "9780156013987", "title": "Le Petit Prince"}),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/books/0156013987",
            json!({"page_count": 96}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["isbn"], "9780156013987");
    assert_eq!(body["title"], "Le Petit Prince");
    assert_eq!(body["page_count"], 96);

    let response = app.oneshot(get("/api/books")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_lookup_serves_cached_record() {
    let (app, _guard) = setup_app().await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/books",
            json!({"isbn": "9780156013987", "title": "Le Petit Prince"}),
        ))
        .await
        .unwrap();

    let response = app.oneshot(get("/api/lookup/0156013987")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["cached"], true);
    assert_eq!(body["isbn"], "9780156013987");
}

#[tokio::test]
async fn test_lookup_miss_with_no_sources_is_404() {
    let (app, _guard) = setup_app().await;

    let response = app.oneshot(get("/api/lookup/9780156013987")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_lookup_rejects_invalid_isbn() {
    let (app, _guard) = setup_app().await;

    let response = app.oneshot(get("/api/lookup/12345")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_by_isbn10_removes_canonical_record() {
    let (app, _guard) = setup_app().await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/books",
            json!({"isbn": "9780156013987", "title": "Le Petit Prince"}),
        ))
        .await
        .unwrap();

    let response = app.clone().oneshot(delete("/api/books/0156013987")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.clone().oneshot(get("/api/books/9780156013987")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Second delete reports nothing to remove
    let response = app.oneshot(delete("/api/books/0156013987")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_empty_store() {
    let (app, _guard) = setup_app().await;

    let response = app.oneshot(get("/api/books")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["total"], 0);
    assert_eq!(body["books"], json!([]));
}

#[tokio::test]
async fn test_sentinel_round_trip_through_api() {
    let (app, _guard) = setup_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/books",
            json!({"isbn": "6666666666666", "title": "Easter Egg"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(get("/api/books/6666666666666")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["isbn"], "6666666666666");
}
