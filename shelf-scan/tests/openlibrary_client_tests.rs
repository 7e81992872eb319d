//! Open Library client tests against a local fake catalog
//!
//! Primary lookup failures must fail the resolution; author lookup failures
//! must only leave the author empty.

mod helpers;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use helpers::{client_for, client_with_timeout, spawn_catalog, unreachable_base_url};
use serde_json::json;
use shelf_scan::{normalize, MetadataResolver, ResolutionError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const ISBN: &str = "9780134685991";

fn kernighan_edition() -> serde_json::Value {
    json!({
        "title": "The C Programming Language",
        "authors": [{"key": "/authors/OL1A"}],
        "publishers": ["Prentice Hall"],
        "publish_date": "1988"
    })
}

#[tokio::test]
async fn test_resolves_edition_and_author() {
    let app = Router::new()
        .route("/isbn/9780134685991.json", get(|| async { Json(kernighan_edition()) }))
        .route(
            "/authors/OL1A.json",
            get(|| async { Json(json!({"name": "Brian Kernighan"})) }),
        );
    let base = spawn_catalog(app).await;

    let metadata = client_for(&base)
        .resolve(&normalize(ISBN).unwrap())
        .await
        .unwrap();

    assert_eq!(metadata.isbn, ISBN);
    assert_eq!(metadata.title.as_deref(), Some("The C Programming Language"));
    assert_eq!(metadata.author.as_deref(), Some("Brian Kernighan"));
    assert_eq!(metadata.publisher.as_deref(), Some("Prentice Hall"));
    assert_eq!(metadata.published_year, Some(1988));
}

#[tokio::test]
async fn test_missing_edition_is_not_found() {
    let base = spawn_catalog(Router::new()).await;

    let result = client_for(&base).resolve(&normalize(ISBN).unwrap()).await;

    assert!(matches!(result, Err(ResolutionError::NotFound(ref isbn)) if isbn == ISBN));
}

#[tokio::test]
async fn test_server_error_fails_resolution() {
    let app = Router::new().route(
        "/isbn/9780134685991.json",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
    );
    let base = spawn_catalog(app).await;

    let result = client_for(&base).resolve(&normalize(ISBN).unwrap()).await;

    assert!(matches!(result, Err(ResolutionError::Api(503, _))));
}

#[tokio::test]
async fn test_malformed_edition_fails_resolution() {
    let app = Router::new().route("/isbn/9780134685991.json", get(|| async { "<html>oops</html>" }));
    let base = spawn_catalog(app).await;

    let result = client_for(&base).resolve(&normalize(ISBN).unwrap()).await;

    assert!(matches!(result, Err(ResolutionError::Parse(_))));
}

#[tokio::test]
async fn test_unreachable_catalog_fails_resolution() {
    let base = unreachable_base_url().await;

    let result = client_for(&base).resolve(&normalize(ISBN).unwrap()).await;

    assert!(matches!(result, Err(ResolutionError::Network(_))));
}

#[tokio::test]
async fn test_author_error_leaves_author_empty() {
    let app = Router::new()
        .route("/isbn/9780134685991.json", get(|| async { Json(kernighan_edition()) }))
        .route(
            "/authors/OL1A.json",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
    let base = spawn_catalog(app).await;

    let metadata = client_for(&base)
        .resolve(&normalize(ISBN).unwrap())
        .await
        .unwrap();

    assert_eq!(metadata.author, None);
    assert_eq!(metadata.title.as_deref(), Some("The C Programming Language"));
}

#[tokio::test]
async fn test_author_missing_or_malformed_leaves_author_empty() {
    // No author route at all: 404
    let app = Router::new().route("/isbn/9780134685991.json", get(|| async { Json(kernighan_edition()) }));
    let base = spawn_catalog(app).await;
    let metadata = client_for(&base).resolve(&normalize(ISBN).unwrap()).await.unwrap();
    assert_eq!(metadata.author, None);

    // Author body that is not JSON
    let app = Router::new()
        .route("/isbn/9780134685991.json", get(|| async { Json(kernighan_edition()) }))
        .route("/authors/OL1A.json", get(|| async { "not json" }));
    let base = spawn_catalog(app).await;
    let metadata = client_for(&base).resolve(&normalize(ISBN).unwrap()).await.unwrap();
    assert_eq!(metadata.author, None);
}

#[tokio::test]
async fn test_slow_author_times_out_softly() {
    let app = Router::new()
        .route("/isbn/9780134685991.json", get(|| async { Json(kernighan_edition()) }))
        .route(
            "/authors/OL1A.json",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({"name": "Too Late"}))
            }),
        );
    let base = spawn_catalog(app).await;

    let metadata = client_with_timeout(&base, 1)
        .resolve(&normalize(ISBN).unwrap())
        .await
        .unwrap();

    assert_eq!(metadata.author, None);
}

#[tokio::test]
async fn test_no_author_reference_skips_second_request() {
    let author_hits = Arc::new(AtomicUsize::new(0));
    let hits = author_hits.clone();

    let app = Router::new()
        .route(
            "/isbn/9780134685991.json",
            get(|| async { Json(json!({"title": "Anonymous Work", "authors": []})) }),
        )
        .route(
            "/authors/OL1A.json",
            get(move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({"name": "Nobody"}))
                }
            }),
        );
    let base = spawn_catalog(app).await;

    let metadata = client_for(&base)
        .resolve(&normalize(ISBN).unwrap())
        .await
        .unwrap();

    assert_eq!(metadata.author, None);
    assert_eq!(author_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_sparse_edition_fields() {
    let app = Router::new().route(
        "/isbn/9780134685991.json",
        get(|| async {
            Json(json!({
                "title": null,
                "publishers": [],
                "publish_date": "sometime"
            }))
        }),
    );
    let base = spawn_catalog(app).await;

    let metadata = client_for(&base)
        .resolve(&normalize(ISBN).unwrap())
        .await
        .unwrap();

    assert_eq!(metadata.title, None);
    assert_eq!(metadata.publisher, None);
    assert_eq!(metadata.published_year, None);
}

#[tokio::test]
async fn test_publish_date_tail_is_parsed() {
    let app = Router::new().route(
        "/isbn/9780134685991.json",
        get(|| async {
            Json(json!({
                "title": "Effective Java",
                "publishers": ["Addison-Wesley", "Pearson"],
                "publish_date": "Dec 27, 2017"
            }))
        }),
    );
    let base = spawn_catalog(app).await;

    let metadata = client_for(&base)
        .resolve(&normalize(ISBN).unwrap())
        .await
        .unwrap();

    assert_eq!(metadata.publisher.as_deref(), Some("Addison-Wesley"));
    assert_eq!(metadata.published_year, Some(2017));
}

#[tokio::test]
async fn test_empty_author_key_skips_second_request() {
    let stray_hits = Arc::new(AtomicUsize::new(0));
    let hits = stray_hits.clone();

    let app = Router::new()
        .route(
            "/isbn/9780134685991.json",
            get(|| async {
                Json(json!({"title": "Keyless", "authors": [{"key": ""}]}))
            }),
        )
        .route(
            "/.json",
            get(move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({"name": "Nobody"}))
                }
            }),
        );
    let base = spawn_catalog(app).await;

    let metadata = client_for(&base)
        .resolve(&normalize(ISBN).unwrap())
        .await
        .unwrap();

    assert_eq!(metadata.title.as_deref(), Some("Keyless"));
    assert_eq!(metadata.author, None);
    assert_eq!(stray_hits.load(Ordering::SeqCst), 0);
}
