//! Book record store
//!
//! Sole writer of the `books` table. Rows are keyed by ISBN through upsert
//! semantics: one row per distinct ISBN, updated in place on every later
//! write.

use crate::db::init::{init_database, init_memory_database};
use crate::db::models::{BookMetadata, BookRecord, ReadingFields, ReadingStatus, SortOrder};
use crate::{time, Error, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::path::Path;
use tracing::{debug, info, warn};

const SELECT_COLUMNS: &str = "id, isbn, title, author, publisher, published_year, \
     reading_status, progress, rating, created_at, updated_at";

/// SQLite-backed book record store
///
/// Constructed explicitly with [`BookStore::open`] or
/// [`BookStore::open_in_memory`] and passed by reference to callers.
#[derive(Debug, Clone)]
pub struct BookStore {
    pool: SqlitePool,
}

impl BookStore {
    /// Open the database file at `db_path`, creating it and the schema if needed
    pub async fn open(db_path: &Path) -> Result<Self> {
        let pool = init_database(db_path).await?;
        Ok(Self { pool })
    }

    /// Open a throwaway in-memory store
    pub async fn open_in_memory() -> Result<Self> {
        let pool = init_memory_database().await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all pooled connections
    pub async fn close(self) {
        self.pool.close().await;
    }

    /// Insert or update the record for `metadata.isbn`
    ///
    /// Existing rows keep their `id` and `created_at`; every metadata and
    /// reading field is overwritten, absent reading fields taking their
    /// defaults. Runs as one statement so concurrent upserts of the same
    /// ISBN cannot create a second row.
    ///
    /// Returns the row id.
    pub async fn upsert(&self, metadata: &BookMetadata, reading: &ReadingFields) -> Result<i64> {
        if metadata.isbn.trim().is_empty() {
            return Err(Error::InvalidInput("ISBN is required".to_string()));
        }

        let now = time::now_rfc3339();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO books (
                isbn, title, author, publisher, published_year,
                reading_status, progress, rating, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(isbn) DO UPDATE SET
                title = excluded.title,
                author = excluded.author,
                publisher = excluded.publisher,
                published_year = excluded.published_year,
                reading_status = excluded.reading_status,
                progress = excluded.progress,
                rating = excluded.rating,
                updated_at = excluded.updated_at
            RETURNING id
            "#,
        )
        .bind(&metadata.isbn)
        .bind(&metadata.title)
        .bind(&metadata.author)
        .bind(&metadata.publisher)
        .bind(metadata.published_year)
        .bind(reading.status_or_default().as_str())
        .bind(reading.progress_or_default())
        .bind(reading.rating_or_default())
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await?;

        info!(id, isbn = %metadata.isbn, "Upserted book record");

        Ok(id)
    }

    /// Overwrite the reading-state fields of row `id`
    ///
    /// Unspecified fields are reset to their defaults rather than kept.
    /// An unknown `id` is a no-op.
    pub async fn patch(&self, id: i64, fields: &ReadingFields) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE books SET
                reading_status = ?,
                progress = ?,
                rating = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(fields.status_or_default().as_str())
        .bind(fields.progress_or_default())
        .bind(fields.rating_or_default())
        .bind(time::now_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!(id, "Patch matched no book record");
        }

        Ok(())
    }

    /// All records ordered case-insensitively by `order`, then by title
    pub async fn list(&self, order: SortOrder) -> Result<Vec<BookRecord>> {
        // Column comes from a closed enum, never from caller text
        let sql = format!(
            "SELECT {} FROM books ORDER BY {} COLLATE NOCASE ASC, title COLLATE NOCASE ASC",
            SELECT_COLUMNS,
            order.column()
        );

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(record_from_row).collect()
    }

    /// Load a record by surrogate id
    pub async fn get(&self, id: i64) -> Result<Option<BookRecord>> {
        let sql = format!("SELECT {} FROM books WHERE id = ?", SELECT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(record_from_row).transpose()
    }

    /// Load a record by ISBN
    pub async fn find_by_isbn(&self, isbn: &str) -> Result<Option<BookRecord>> {
        let sql = format!("SELECT {} FROM books WHERE isbn = ?", SELECT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(record_from_row).transpose()
    }

    /// Number of stored records
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn record_from_row(row: &SqliteRow) -> Result<BookRecord> {
    let status_str: String = row.try_get("reading_status")?;
    let reading_status = status_str.parse::<ReadingStatus>().unwrap_or_else(|_| {
        warn!(status = %status_str, "Unknown reading status in database, treating as pending");
        ReadingStatus::Pending
    });

    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(BookRecord {
        id: row.try_get("id")?,
        isbn: row.try_get("isbn")?,
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        publisher: row.try_get("publisher")?,
        published_year: row.try_get("published_year")?,
        reading_status,
        progress: row.try_get("progress")?,
        rating: row.try_get("rating")?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::CorruptRecord(format!("Invalid timestamp '{}': {}", value, e)))
}
