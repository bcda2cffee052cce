//! Multi-source metadata resolution
//!
//! Probes sources in configured order; first hit wins. A source miss falls
//! through to the next source, a source error is logged and likewise falls
//! through — one flaky source must not mask another's answer.

use tracing::{debug, warn};

use shelf_common::{isbn, BookFields};

use crate::services::{GoogleBooksClient, MetadataSource, OpenLibraryClient, SourceError};

/// Ordered collection of external sources
pub struct MetadataResolver {
    sources: Vec<Box<dyn MetadataSource>>,
}

impl MetadataResolver {
    /// Default source order: Google Books, then Open Library
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self {
            sources: vec![
                Box::new(GoogleBooksClient::new()?),
                Box::new(OpenLibraryClient::new()?),
            ],
        })
    }

    /// Resolver over an explicit source list (tests use an empty list)
    pub fn with_sources(sources: Vec<Box<dyn MetadataSource>>) -> Self {
        Self { sources }
    }

    /// Fetch metadata for a cleaned ISBN from the first source that knows it.
    ///
    /// The sentinel is cache-only and never sent to external sources.
    pub async fn resolve(&self, cleaned: &str) -> Option<BookFields> {
        if cleaned == isbn::SENTINEL_ISBN {
            return None;
        }

        for source in &self.sources {
            match source.fetch(cleaned).await {
                Ok(Some(fields)) => return Some(fields),
                Ok(None) => {
                    debug!(isbn = %cleaned, source = source.source_id(), "Source miss");
                }
                Err(e) => {
                    warn!(isbn = %cleaned, source = source.source_id(), error = %e, "Source error");
                }
            }
        }
        None
    }
}
