//! Google Books API client
//!
//! Volume search by ISBN (`/books/v1/volumes?q=isbn:{isbn}`); the first
//! matching volume's `volumeInfo` is mapped to record fields.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use shelf_common::BookFields;

use crate::services::{MetadataSource, RateLimiter, SourceError};

const GOOGLEBOOKS_BASE_URL: &str = "https://www.googleapis.com/books/v1";
const USER_AGENT: &str = concat!("shelf/", env!("CARGO_PKG_VERSION"));
const RATE_LIMIT_MS: u64 = 500;

/// Volume search response
#[derive(Debug, Clone, Deserialize)]
struct GbVolumeList {
    #[serde(rename = "totalItems")]
    total_items: i64,
    items: Option<Vec<GbVolume>>,
}

#[derive(Debug, Clone, Deserialize)]
struct GbVolume {
    #[serde(rename = "volumeInfo")]
    volume_info: GbVolumeInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GbVolumeInfo {
    title: Option<String>,
    authors: Option<Vec<String>>,
    publisher: Option<String>,
    published_date: Option<String>,
    description: Option<String>,
    page_count: Option<i64>,
    categories: Option<Vec<String>>,
    language: Option<String>,
    image_links: Option<GbImageLinks>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GbImageLinks {
    thumbnail: Option<String>,
    small_thumbnail: Option<String>,
}

/// Google Books API client
pub struct GoogleBooksClient {
    http_client: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
}

impl GoogleBooksClient {
    pub fn new() -> Result<Self, SourceError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter: Arc::new(RateLimiter::new(RATE_LIMIT_MS)),
        })
    }
}

fn volume_to_fields(info: GbVolumeInfo) -> BookFields {
    BookFields {
        title: info.title,
        authors: info.authors,
        publisher: info.publisher,
        published_date: info.published_date,
        page_count: info.page_count,
        categories: info.categories,
        language: info.language,
        description: info.description,
        cover_url: info
            .image_links
            .and_then(|links| links.thumbnail.or(links.small_thumbnail)),
        source: Some("googlebooks".to_string()),
    }
}

#[async_trait]
impl MetadataSource for GoogleBooksClient {
    fn source_id(&self) -> &'static str {
        "googlebooks"
    }

    async fn fetch(&self, isbn: &str) -> Result<Option<BookFields>, SourceError> {
        self.rate_limiter.wait().await;

        let url = format!("{}/volumes?q=isbn:{}", GOOGLEBOOKS_BASE_URL, isbn);
        debug!(isbn = %isbn, url = %url, "Querying Google Books");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SourceError::Api(status.as_u16(), error_text));
        }

        let list: GbVolumeList = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        if list.total_items == 0 {
            return Ok(None);
        }
        let Some(volume) = list.items.and_then(|items| items.into_iter().next()) else {
            return Ok(None);
        };

        let fields = volume_to_fields(volume.volume_info);
        info!(
            isbn = %isbn,
            title = fields.title.as_deref().unwrap_or("Unknown"),
            "Retrieved volume from Google Books"
        );
        Ok(Some(fields))
    }
}
