//! Open Library API client
//!
//! Edition lookup by ISBN (`/isbn/{isbn}.json`), with author names resolved
//! through follow-up `/authors/{key}.json` requests and cover URLs built
//! from the covers service.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use shelf_common::BookFields;

use crate::services::{MetadataSource, RateLimiter, SourceError};

const OPENLIBRARY_BASE_URL: &str = "https://openlibrary.org";
const COVERS_BASE_URL: &str = "https://covers.openlibrary.org";
const USER_AGENT: &str = concat!("shelf/", env!("CARGO_PKG_VERSION"));
const RATE_LIMIT_MS: u64 = 500;

/// Open Library edition response (the fields this suite consumes)
#[derive(Debug, Clone, Deserialize)]
struct OlEdition {
    title: Option<String>,
    number_of_pages: Option<i64>,
    publishers: Option<Vec<String>>,
    publish_date: Option<String>,
    subjects: Option<Vec<String>>,
    languages: Option<Vec<OlKeyRef>>,
    authors: Option<Vec<OlKeyRef>>,
    covers: Option<Vec<i64>>,
    description: Option<OlText>,
}

/// Reference to another Open Library entity (`{"key": "/authors/OL23919A"}`)
#[derive(Debug, Clone, Deserialize)]
struct OlKeyRef {
    key: String,
}

/// Open Library text values appear both bare and wrapped
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OlText {
    Plain(String),
    Typed { value: String },
}

impl OlText {
    fn into_string(self) -> String {
        match self {
            OlText::Plain(s) => s,
            OlText::Typed { value } => value,
        }
    }
}

/// Open Library author response
#[derive(Debug, Clone, Deserialize)]
struct OlAuthor {
    name: Option<String>,
}

/// Open Library API client
pub struct OpenLibraryClient {
    http_client: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
}

impl OpenLibraryClient {
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

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Option<T>, SourceError> {
        self.rate_limiter.wait().await;

        debug!(url = %url, "Querying Open Library");
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if status == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SourceError::Api(status.as_u16(), error_text));
        }

        let value = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;
        Ok(Some(value))
    }

    /// Resolve author reference keys to display names.
    ///
    /// A failed author fetch degrades to skipping that name rather than
    /// failing the whole lookup.
    async fn author_names(&self, refs: &[OlKeyRef]) -> Vec<String> {
        let mut names = Vec::with_capacity(refs.len());
        for author_ref in refs {
            let url = format!("{}{}.json", OPENLIBRARY_BASE_URL, author_ref.key);
            match self.get_json::<OlAuthor>(&url).await {
                Ok(Some(OlAuthor { name: Some(name) })) => names.push(name),
                Ok(_) => {}
                Err(e) => warn!(key = %author_ref.key, error = %e, "Author fetch failed"),
            }
        }
        names
    }

    fn edition_to_fields(&self, edition: OlEdition, author_names: Vec<String>) -> BookFields {
        BookFields {
            title: edition.title,
            authors: (!author_names.is_empty()).then_some(author_names),
            publisher: edition.publishers.and_then(|p| p.into_iter().next()),
            published_date: edition.publish_date,
            page_count: edition.number_of_pages,
            categories: edition.subjects,
            language: edition
                .languages
                .and_then(|l| l.into_iter().next())
                .map(|l| trailing_segment(&l.key)),
            description: edition.description.map(OlText::into_string),
            cover_url: edition
                .covers
                .and_then(|c| c.into_iter().next())
                .map(|id| format!("{}/b/id/{}-L.jpg", COVERS_BASE_URL, id)),
            source: Some("openlibrary".to_string()),
        }
    }
}

/// `/languages/fre` → `fre`
fn trailing_segment(key: &str) -> String {
    key.rsplit('/').next().unwrap_or(key).to_string()
}

#[async_trait]
impl MetadataSource for OpenLibraryClient {
    fn source_id(&self) -> &'static str {
        "openlibrary"
    }

    async fn fetch(&self, isbn: &str) -> Result<Option<BookFields>, SourceError> {
        let url = format!("{}/isbn/{}.json", OPENLIBRARY_BASE_URL, isbn);
        let Some(edition) = self.get_json::<OlEdition>(&url).await? else {
            return Ok(None);
        };

        let author_refs = edition.authors.clone().unwrap_or_default();
        let author_names = self.author_names(&author_refs).await;

        let fields = self.edition_to_fields(edition, author_names);
        info!(
            isbn = %isbn,
            title = fields.title.as_deref().unwrap_or("Unknown"),
            "Retrieved edition from Open Library"
        );
        Ok(Some(fields))
    }
}
