//! Book table access
//!
//! `SqliteStore` adapts the `books` table to the record store contract.
//! List-valued fields (`authors`, `categories`) are stored as JSON text
//! columns; timestamps as RFC 3339 text.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::record::BookRecord;
use crate::store::RecordStore;
use crate::Result;

/// SQLite-backed record store used by the lookup server
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn row_to_record(row: &SqliteRow) -> BookRecord {
    let authors: Option<String> = row.get("authors");
    let categories: Option<String> = row.get("categories");

    BookRecord {
        isbn: row.get("isbn"),
        title: row.get("title"),
        authors: authors.and_then(|s| serde_json::from_str(&s).ok()),
        publisher: row.get("publisher"),
        published_date: row.get("published_date"),
        page_count: row.get("page_count"),
        categories: categories.and_then(|s| serde_json::from_str(&s).ok()),
        language: row.get("language"),
        description: row.get("description"),
        cover_url: row.get("cover_url"),
        source: row.get("source"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<BookRecord>> {
        let row = sqlx::query(
            r#"
            SELECT isbn, title, authors, publisher, published_date, page_count,
                   categories, language, description, cover_url, source,
                   created_at, updated_at
            FROM books
            WHERE isbn = ?
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_record))
    }

    async fn set(&self, key: &str, record: BookRecord) -> Result<()> {
        let authors = record
            .authors
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let categories = record
            .categories
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            r#"
            INSERT INTO books (
                isbn, title, authors, publisher, published_date, page_count,
                categories, language, description, cover_url, source,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(isbn) DO UPDATE SET
                title = excluded.title,
                authors = excluded.authors,
                publisher = excluded.publisher,
                published_date = excluded.published_date,
                page_count = excluded.page_count,
                categories = excluded.categories,
                language = excluded.language,
                description = excluded.description,
                cover_url = excluded.cover_url,
                source = excluded.source,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(&record.title)
        .bind(&authors)
        .bind(&record.publisher)
        .bind(&record.published_date)
        .bind(record.page_count)
        .bind(&categories)
        .bind(&record.language)
        .bind(&record.description)
        .bind(&record.cover_url)
        .bind(&record.source)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let keys = sqlx::query_scalar("SELECT isbn FROM books ORDER BY isbn")
            .fetch_all(&self.pool)
            .await?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use crate::record::BookFields;
    use crate::time;

    async fn setup_store() -> SqliteStore {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS books (
                isbn TEXT PRIMARY KEY,
                title TEXT,
                authors TEXT,
                publisher TEXT,
                published_date TEXT,
                page_count INTEGER,
                categories TEXT,
                language TEXT,
                description TEXT,
                cover_url TEXT,
                source TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();
        SqliteStore::new(pool)
    }

    fn sample() -> BookRecord {
        BookRecord::new(
            "9780156013987".to_string(),
            BookFields {
                title: Some("Le Petit Prince".to_string()),
                authors: Some(vec!["Antoine de Saint-Exupéry".to_string()]),
                page_count: Some(96),
                categories: Some(vec!["Fiction".to_string(), "Classics".to_string()]),
                ..Default::default()
            },
            time::now(),
        )
    }

    #[tokio::test]
    async fn test_set_and_get_round_trips_all_fields() {
        let store = setup_store().await;
        let record = sample();

        store.set("9780156013987", record.clone()).await.unwrap();
        let loaded = store.get("9780156013987").await.unwrap().unwrap();

        assert_eq!(loaded.isbn, record.isbn);
        assert_eq!(loaded.title, record.title);
        assert_eq!(loaded.authors, record.authors);
        assert_eq!(loaded.page_count, record.page_count);
        assert_eq!(loaded.categories, record.categories);
        assert_eq!(loaded.created_at, record.created_at);
        assert_eq!(loaded.updated_at, record.updated_at);
    }

    #[tokio::test]
    async fn test_set_replaces_existing_entry() {
        let store = setup_store().await;
        let mut record = sample();

        store.set("9780156013987", record.clone()).await.unwrap();
        record.page_count = Some(104);
        store.set("9780156013987", record).await.unwrap();

        let loaded = store.get("9780156013987").await.unwrap().unwrap();
        assert_eq!(loaded.page_count, Some(104));
        assert_eq!(store.keys().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let store = setup_store().await;
        store.set("9780156013987", sample()).await.unwrap();

        assert!(store.delete("9780156013987").await.unwrap());
        assert!(!store.delete("9780156013987").await.unwrap());
    }

    #[tokio::test]
    async fn test_store_over_initialized_database() {
        let dir = tempfile::tempdir().unwrap();
        let pool = init_database(&dir.path().join("shelf.db")).await.unwrap();
        let store = SqliteStore::new(pool);

        store.set("9780156013987", sample()).await.unwrap();
        assert_eq!(store.keys().await.unwrap(), vec!["9780156013987"]);
    }
}
