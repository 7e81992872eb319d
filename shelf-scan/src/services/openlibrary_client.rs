//! Open Library API client
//!
//! Resolves an ISBN in up to two requests:
//! 1. `GET {base}/isbn/{isbn}.json`: edition record. Any failure here fails
//!    the resolution.
//! 2. `GET {base}{author_key}.json`: first author's name. Best-effort; any
//!    failure leaves the author empty.

use crate::services::isbn_normalizer::Isbn;
use crate::services::metadata_resolver::{MetadataResolver, ResolutionError};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use shelf_common::config::CatalogConfig;
use shelf_common::BookMetadata;
use std::time::Duration;
use tracing::{debug, info};

/// Open Library edition record (fields we consume)
#[derive(Debug, Clone, Deserialize)]
pub struct OLEdition {
    pub title: Option<String>,
    pub authors: Option<Vec<OLAuthorRef>>,
    pub publishers: Option<Vec<String>>,
    pub publish_date: Option<String>,
}

/// Reference from an edition to an author record
#[derive(Debug, Clone, Deserialize)]
pub struct OLAuthorRef {
    /// Path such as `/authors/OL1A`
    pub key: Option<String>,
}

/// Open Library author record
#[derive(Debug, Clone, Deserialize)]
pub struct OLAuthor {
    pub name: Option<String>,
}

/// Open Library client
pub struct OpenLibraryClient {
    http_client: Client,
    base_url: String,
}

impl OpenLibraryClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, ResolutionError> {
        let user_agent = header::HeaderValue::from_str(&config.user_agent)
            .map_err(|e| ResolutionError::Network(format!("Invalid user agent: {}", e)))?;
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, user_agent);

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| ResolutionError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the edition record for `isbn`
    pub async fn fetch_edition(&self, isbn: &Isbn) -> Result<OLEdition, ResolutionError> {
        let url = format!("{}/isbn/{}.json", self.base_url, isbn);
        debug!(isbn = %isbn, url = %url, "Querying Open Library edition");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ResolutionError::Network(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ResolutionError::NotFound(isbn.to_string()));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ResolutionError::Api(status.as_u16(), error_text));
        }

        response
            .json::<OLEdition>()
            .await
            .map_err(|e| ResolutionError::Parse(e.to_string()))
    }

    /// Fetch an author's display name, swallowing every failure
    pub async fn fetch_author_name(&self, author_key: &str) -> Option<String> {
        let path = if author_key.starts_with('/') {
            author_key.to_string()
        } else {
            format!("/{}", author_key)
        };
        let url = format!("{}{}.json", self.base_url, path);
        debug!(url = %url, "Querying Open Library author");

        let response = match self.http_client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!(error = %e, "Author lookup failed, leaving author empty");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(status = %response.status(), "Author lookup returned non-success status");
            return None;
        }

        match response.json::<OLAuthor>().await {
            Ok(author) => author.name,
            Err(e) => {
                debug!(error = %e, "Author record could not be parsed");
                None
            }
        }
    }
}

#[async_trait]
impl MetadataResolver for OpenLibraryClient {
    fn name(&self) -> &'static str {
        "OpenLibrary"
    }

    async fn resolve(&self, isbn: &Isbn) -> Result<BookMetadata, ResolutionError> {
        let edition = self.fetch_edition(isbn).await?;

        let author_key = edition
            .authors
            .as_ref()
            .and_then(|authors| authors.first())
            .and_then(|a| a.key.clone())
            .filter(|key| !key.is_empty());

        let author = match author_key {
            Some(key) => self.fetch_author_name(&key).await,
            None => None,
        };

        let metadata = BookMetadata {
            isbn: isbn.to_string(),
            title: edition.title,
            author,
            publisher: edition.publishers.and_then(|p| p.into_iter().next()),
            published_year: edition.publish_date.as_deref().and_then(parse_published_year),
        };

        info!(
            isbn = %isbn,
            title = %metadata.title.as_deref().unwrap_or("Unknown"),
            author = %metadata.author.as_deref().unwrap_or("Unknown"),
            "Retrieved edition from Open Library"
        );

        Ok(metadata)
    }
}

/// Year from the last four characters of a free-form publish date
///
/// "March 1988" → 1988. Unparsable text and a literal zero yield `None`.
pub fn parse_published_year(publish_date: &str) -> Option<i64> {
    let chars: Vec<char> = publish_date.chars().collect();
    let start = chars.len().saturating_sub(4);
    let tail: String = chars[start..].iter().collect();

    tail.trim().parse::<i64>().ok().filter(|year| *year != 0)
}
