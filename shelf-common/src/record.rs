//! Book record model and field-level merge

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A cached book record, keyed by canonical ISBN.
///
/// Only the key and timestamps are required; metadata fields fill in over
/// time from external lookups and manual contributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Canonical storage key (ISBN-13 form, or the sentinel)
    pub isbn: String,
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub page_count: Option<i64>,
    pub categories: Option<Vec<String>>,
    pub language: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    /// Provenance tag ("googlebooks", "openlibrary", "manual", ...)
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Incoming update shape for a record: every metadata field optional.
///
/// Merge contract: a set field overwrites the stored value, an unset field
/// preserves it. The canonical key and timestamps are managed by the
/// reconciliation layer, not by callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookFields {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub page_count: Option<i64>,
    pub categories: Option<Vec<String>>,
    pub language: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub source: Option<String>,
}

impl BookRecord {
    /// Create a new record from incoming fields under the given canonical key
    pub fn new(isbn: String, fields: BookFields, at: DateTime<Utc>) -> Self {
        Self {
            isbn,
            title: fields.title,
            authors: fields.authors,
            publisher: fields.publisher,
            published_date: fields.published_date,
            page_count: fields.page_count,
            categories: fields.categories,
            language: fields.language,
            description: fields.description,
            cover_url: fields.cover_url,
            source: fields.source,
            created_at: at,
            updated_at: at,
        }
    }

    /// Merge incoming fields into this record: incoming wins per field,
    /// absent incoming fields leave the stored value untouched.
    pub fn apply(&mut self, fields: BookFields) {
        if let Some(title) = fields.title {
            self.title = Some(title);
        }
        if let Some(authors) = fields.authors {
            self.authors = Some(authors);
        }
        if let Some(publisher) = fields.publisher {
            self.publisher = Some(publisher);
        }
        if let Some(published_date) = fields.published_date {
            self.published_date = Some(published_date);
        }
        if let Some(page_count) = fields.page_count {
            self.page_count = Some(page_count);
        }
        if let Some(categories) = fields.categories {
            self.categories = Some(categories);
        }
        if let Some(language) = fields.language {
            self.language = Some(language);
        }
        if let Some(description) = fields.description {
            self.description = Some(description);
        }
        if let Some(cover_url) = fields.cover_url {
            self.cover_url = Some(cover_url);
        }
        if let Some(source) = fields.source {
            self.source = Some(source);
        }
    }
}

impl From<&BookRecord> for BookFields {
    /// Extract the metadata fields of an existing record, e.g. when copying
    /// a record from one store into another through the merge path.
    fn from(record: &BookRecord) -> Self {
        Self {
            title: record.title.clone(),
            authors: record.authors.clone(),
            publisher: record.publisher.clone(),
            published_date: record.published_date.clone(),
            page_count: record.page_count,
            categories: record.categories.clone(),
            language: record.language.clone(),
            description: record.description.clone(),
            cover_url: record.cover_url.clone(),
            source: record.source.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time;

    #[test]
    fn test_new_record_sets_both_timestamps() {
        let at = time::now();
        let record = BookRecord::new(
            "9780156013987".to_string(),
            BookFields {
                title: Some("Le Petit Prince".to_string()),
                ..Default::default()
            },
            at,
        );
        assert_eq!(record.created_at, at);
        assert_eq!(record.updated_at, at);
        assert_eq!(record.title.as_deref(), Some("Le Petit Prince"));
        assert!(record.page_count.is_none());
    }

    #[test]
    fn test_apply_incoming_wins_per_field() {
        let mut record = BookRecord::new(
            "9780156013987".to_string(),
            BookFields {
                title: Some("Old Title".to_string()),
                publisher: Some("Harcourt".to_string()),
                ..Default::default()
            },
            time::now(),
        );

        record.apply(BookFields {
            title: Some("Le Petit Prince".to_string()),
            page_count: Some(96),
            ..Default::default()
        });

        assert_eq!(record.title.as_deref(), Some("Le Petit Prince"));
        assert_eq!(record.page_count, Some(96));
        // Absent incoming field preserved
        assert_eq!(record.publisher.as_deref(), Some("Harcourt"));
    }

    #[test]
    fn test_apply_empty_fields_is_noop_on_metadata() {
        let mut record = BookRecord::new(
            "9780156013987".to_string(),
            BookFields {
                title: Some("Le Petit Prince".to_string()),
                authors: Some(vec!["Antoine de Saint-Exupéry".to_string()]),
                ..Default::default()
            },
            time::now(),
        );
        let before = record.clone();

        record.apply(BookFields::default());

        assert_eq!(record, before);
    }
}
