//! Test helpers: a local stand-in for the Open Library HTTP API

#![allow(dead_code)]

use axum::Router;
use shelf_common::config::CatalogConfig;
use shelf_scan::OpenLibraryClient;

/// Serve `app` on an ephemeral localhost port and return its base URL
pub async fn spawn_catalog(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve catalog") });
    format!("http://{}", addr)
}

/// Base URL of a port nothing listens on
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}

pub fn client_for(base_url: &str) -> OpenLibraryClient {
    client_with_timeout(base_url, 5)
}

pub fn client_with_timeout(base_url: &str, timeout_secs: u64) -> OpenLibraryClient {
    let config = CatalogConfig {
        base_url: base_url.to_string(),
        timeout_secs,
        ..Default::default()
    };
    OpenLibraryClient::new(&config).expect("build client")
}
