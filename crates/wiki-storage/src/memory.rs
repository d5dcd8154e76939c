//! In-memory page store.
//!
//! Provides [`MemoryStore`] for tests and throwaway wiki instances. Contents
//! are lost when the store is dropped.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::page::{Page, is_valid_title};
use crate::store::{PageStore, StorageError, StorageErrorKind};

const BACKEND: &str = "Memory";

/// In-memory page store.
///
/// Use the builder methods to seed pages, and [`MemoryStore::fail_with`] to
/// simulate a storage outage.
///
/// # Example
///
/// ```ignore
/// use wiki_storage::{MemoryStore, PageStore};
///
/// let store = MemoryStore::new().with_page("Foo", "hello");
/// let page = store.load("Foo").await?;
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    pages: RwLock<HashMap<String, Vec<u8>>>,
    failure: RwLock<Option<String>>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a page.
    #[must_use]
    pub fn with_page(mut self, title: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.pages
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(title.into(), body.into());
        self
    }

    /// Make every subsequent operation fail as unavailable with `message`.
    ///
    /// Pass `None` to restore normal operation.
    pub fn fail_with(&self, message: Option<&str>) {
        *self.failure.write().unwrap_or_else(PoisonError::into_inner) = message.map(str::to_owned);
    }

    /// Number of stored pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True if no pages are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the simulated failure, if one is set.
    fn check(&self, title: Option<&str>) -> Result<(), StorageError> {
        let failure = self.failure.read().unwrap_or_else(PoisonError::into_inner);
        match failure.as_deref() {
            Some(message) => {
                let mut err = StorageError::new(StorageErrorKind::Unavailable)
                    .with_backend(BACKEND)
                    .with_message(message);
                if let Some(title) = title {
                    err = err.with_title(title);
                }
                Err(err)
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PageStore for MemoryStore {
    async fn save(&self, page: &Page) -> Result<(), StorageError> {
        self.check(Some(&page.title))?;
        if !is_valid_title(&page.title) {
            return Err(StorageError::invalid_title(&page.title).with_backend(BACKEND));
        }
        self.pages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(page.title.clone(), page.body.clone());
        Ok(())
    }

    async fn delete(&self, title: &str) -> Result<(), StorageError> {
        self.check(Some(title))?;
        self.pages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(title);
        Ok(())
    }

    async fn load(&self, title: &str) -> Result<Page, StorageError> {
        self.check(Some(title))?;
        self.pages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(title)
            .map(|body| Page::new(title, body.clone()))
            .ok_or_else(|| StorageError::not_found(title).with_backend(BACKEND))
    }

    async fn list(&self) -> Result<Vec<String>, StorageError> {
        self.check(None)?;
        Ok(self
            .pages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.check(None)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_seeded_page_loads() {
        let store = MemoryStore::new().with_page("Foo", "hello");

        let page = store.load("Foo").await.unwrap();

        assert_eq!(page, Page::new("Foo", "hello"));
    }

    #[tokio::test]
    async fn test_save_replaces_whole_body() {
        let store = MemoryStore::new().with_page("Foo", "a long original body");

        store.save(&Page::new("Foo", "short")).await.unwrap();

        assert_eq!(store.load("Foo").await.unwrap().body, b"short");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let store = MemoryStore::new();

        store.delete("Nope").await.unwrap();

        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_delete_then_load_not_found() {
        let store = MemoryStore::new().with_page("Foo", "hello");

        store.delete("Foo").await.unwrap();

        assert!(store.load("Foo").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_list_empty_is_ok() {
        let store = MemoryStore::new();

        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_affects_every_operation() {
        let store = MemoryStore::new().with_page("Foo", "hello");
        store.fail_with(Some("disk on fire"));

        assert_eq!(
            store.load("Foo").await.unwrap_err().kind,
            StorageErrorKind::Unavailable
        );
        assert!(store.save(&Page::new("Foo", "x")).await.is_err());
        assert!(store.delete("Foo").await.is_err());
        assert!(store.list().await.is_err());
        assert!(store.ping().await.is_err());

        store.fail_with(None);

        assert_eq!(store.load("Foo").await.unwrap().body, b"hello");
    }

    #[tokio::test]
    async fn test_failure_message_in_display() {
        let store = MemoryStore::new();
        store.fail_with(Some("disk on fire"));

        let err = store.delete("Foo").await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "[Memory] Unavailable: disk on fire (title: Foo)"
        );
    }
}
