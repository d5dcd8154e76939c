//! SQLite-backed page store.
//!
//! Each collection is one table holding `{title, body}` documents with the
//! title as primary key. Saves are single `INSERT .. ON CONFLICT DO UPDATE`
//! statements, so a save fully replaces the stored document atomically.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::page::{Page, is_valid_title};
use crate::store::{PageStore, StorageError, StorageErrorKind};

const BACKEND: &str = "Sqlite";

/// Check whether `name` can be used as a collection (table) name.
///
/// Collection names are interpolated into SQL, so only plain identifiers
/// (`[A-Za-z_][A-Za-z0-9_]*`) are accepted.
#[must_use]
pub fn is_valid_collection(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// SQL statements bound to one collection.
#[derive(Debug)]
struct Statements {
    create: String,
    upsert: String,
    delete: String,
    load: String,
    list: String,
}

impl Statements {
    fn for_collection(collection: &str) -> Self {
        Self {
            create: format!(
                "CREATE TABLE IF NOT EXISTS \"{collection}\" (\
                 title TEXT PRIMARY KEY NOT NULL, \
                 body BLOB NOT NULL)"
            ),
            upsert: format!(
                "INSERT INTO \"{collection}\" (title, body) VALUES (?1, ?2) \
                 ON CONFLICT(title) DO UPDATE SET body = excluded.body"
            ),
            delete: format!("DELETE FROM \"{collection}\" WHERE title = ?1"),
            load: format!("SELECT title, body FROM \"{collection}\" WHERE title = ?1"),
            list: format!("SELECT title FROM \"{collection}\""),
        }
    }
}

/// Page store backed by a SQLite database file.
#[derive(Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
    collection: String,
    sql: Statements,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `path` and ensure the
    /// collection table exists.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the collection name is invalid or the
    /// database cannot be opened.
    pub async fn open(path: impl AsRef<Path>, collection: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        Self::connect_with(options, collection).await
    }

    async fn connect_with(
        options: SqliteConnectOptions,
        collection: &str,
    ) -> Result<Self, StorageError> {
        if !is_valid_collection(collection) {
            return Err(StorageError::new(StorageErrorKind::InvalidCollection)
                .with_backend(BACKEND)
                .with_message(format!("'{collection}'")));
        }

        // A single connection is the one shared handle; SQLite serializes
        // writers anyway, and an in-memory database only exists per connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| sqlx_error(e, None))?;

        let store = Self {
            pool,
            collection: collection.to_owned(),
            sql: Statements::for_collection(collection),
        };
        store.migrate().await?;

        tracing::debug!(collection = %store.collection, "Opened SQLite page store");
        Ok(store)
    }

    /// Create the collection table if it does not exist.
    async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::query(&self.sql.create)
            .execute(&self.pool)
            .await
            .map_err(|e| sqlx_error(e, None))?;
        Ok(())
    }
}

/// Map a sqlx error into a storage error.
fn sqlx_error(err: sqlx::Error, title: Option<&str>) -> StorageError {
    let kind = match &err {
        sqlx::Error::RowNotFound => StorageErrorKind::NotFound,
        sqlx::Error::Io(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StorageErrorKind::Unavailable,
        _ => StorageErrorKind::Other,
    };
    let mut error = StorageError::new(kind)
        .with_backend(BACKEND)
        .with_source(err);
    if let Some(title) = title {
        error = error.with_title(title);
    }
    error
}

#[async_trait]
impl PageStore for SqliteStore {
    async fn save(&self, page: &Page) -> Result<(), StorageError> {
        if !is_valid_title(&page.title) {
            return Err(StorageError::invalid_title(&page.title).with_backend(BACKEND));
        }

        sqlx::query(&self.sql.upsert)
            .bind(page.title.as_str())
            .bind(page.body.as_slice())
            .execute(&self.pool)
            .await
            .map_err(|e| sqlx_error(e, Some(&page.title)))?;

        tracing::debug!(title = %page.title, bytes = page.body.len(), "Saved page");
        Ok(())
    }

    async fn delete(&self, title: &str) -> Result<(), StorageError> {
        let result = sqlx::query(&self.sql.delete)
            .bind(title)
            .execute(&self.pool)
            .await
            .map_err(|e| sqlx_error(e, Some(title)))?;

        tracing::debug!(title, removed = result.rows_affected(), "Deleted page");
        Ok(())
    }

    async fn load(&self, title: &str) -> Result<Page, StorageError> {
        let row: Option<(String, Vec<u8>)> = sqlx::query_as(&self.sql.load)
            .bind(title)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| sqlx_error(e, Some(title)))?;

        row.map(|(title, body)| Page { title, body })
            .ok_or_else(|| StorageError::not_found(title).with_backend(BACKEND))
    }

    async fn list(&self) -> Result<Vec<String>, StorageError> {
        sqlx::query_scalar(&self.sql.list)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| sqlx_error(e, None))
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| sqlx_error(e, None))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::*;

    async fn open_in_memory(collection: &str) -> Result<SqliteStore, StorageError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
        SqliteStore::connect_with(options, collection).await
    }

    async fn store() -> SqliteStore {
        open_in_memory("pages").await.unwrap()
    }

    #[test]
    fn test_valid_collection_names() {
        assert!(is_valid_collection("pages"));
        assert!(is_valid_collection("Pages"));
        assert!(is_valid_collection("_wiki_pages2"));
    }

    #[test]
    fn test_invalid_collection_names() {
        assert!(!is_valid_collection(""));
        assert!(!is_valid_collection("2pages"));
        assert!(!is_valid_collection("pages; DROP TABLE x"));
        assert!(!is_valid_collection("my\"pages"));
        assert!(!is_valid_collection("my-pages"));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = store().await;

        store.save(&Page::new("Foo", "hello")).await.unwrap();
        let page = store.load("Foo").await.unwrap();

        assert_eq!(page, Page::new("Foo", "hello"));
    }

    #[tokio::test]
    async fn test_save_replaces_body() {
        let store = store().await;

        store.save(&Page::new("Foo", "first version, long")).await.unwrap();
        store.save(&Page::new("Foo", "second")).await.unwrap();

        assert_eq!(store.load("Foo").await.unwrap().body, b"second");
        assert_eq!(store.list().await.unwrap(), vec!["Foo".to_owned()]);
    }

    #[tokio::test]
    async fn test_load_missing_is_not_found() {
        let store = store().await;

        let err = store.load("Missing").await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.title.as_deref(), Some("Missing"));
        assert_eq!(err.backend, Some("Sqlite"));
    }

    #[tokio::test]
    async fn test_delete_then_load_is_not_found() {
        let store = store().await;
        store.save(&Page::new("Foo", "hello")).await.unwrap();

        store.delete("Foo").await.unwrap();

        assert!(store.load("Foo").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let store = store().await;

        store.delete("Missing").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_empty() {
        let store = store().await;

        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_all_titles() {
        let store = store().await;
        for title in ["Beta", "Alpha", "Gamma"] {
            store.save(&Page::new(title, "x")).await.unwrap();
        }

        let mut titles = store.list().await.unwrap();
        titles.sort();

        assert_eq!(titles, vec!["Alpha", "Beta", "Gamma"]);
    }

    #[tokio::test]
    async fn test_save_rejects_invalid_title() {
        let store = store().await;

        let err = store.save(&Page::new("Foo Bar", "x")).await.unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::InvalidTitle);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_binary_body_round_trip() {
        let store = store().await;
        let body = vec![0u8, 159, 146, 150, 255];

        store.save(&Page::new("Bin", body.clone())).await.unwrap();

        assert_eq!(store.load("Bin").await.unwrap().body, body);
    }

    #[tokio::test]
    async fn test_invalid_collection_rejected() {
        let err = open_in_memory("pages; --").await.unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::InvalidCollection);
    }

    #[tokio::test]
    async fn test_collections_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wiki.db");
        let pages = SqliteStore::open(&path, "pages").await.unwrap();
        pages.save(&Page::new("Foo", "hello")).await.unwrap();
        pages.pool.close().await;

        let drafts = SqliteStore::open(&path, "drafts").await.unwrap();

        assert!(drafts.list().await.unwrap().is_empty());
        assert_eq!(drafts.collection, "drafts");
    }

    #[tokio::test]
    async fn test_pages_persist_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wiki.db");

        let store = SqliteStore::open(&path, "pages").await.unwrap();
        store.save(&Page::new("Foo", "hello")).await.unwrap();
        store.pool.close().await;

        let reopened = SqliteStore::open(&path, "pages").await.unwrap();
        reopened.ping().await.unwrap();

        assert_eq!(reopened.load("Foo").await.unwrap().body, b"hello");
    }

    #[tokio::test]
    async fn test_open_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/wiki.db");

        let result = SqliteStore::open(&path, "pages").await;

        assert!(result.is_err());
    }
}
