//! Page store trait and error types.
//!
//! Provides the core [`PageStore`] trait for the page collection, along with
//! [`StorageError`] for unified error handling across backends.
//!
//! # Keys
//!
//! Every method is addressed by page title. Titles are validated by the
//! router before reaching a store, and backends reject invalid titles on
//! write with [`StorageErrorKind::InvalidTitle`].

use async_trait::async_trait;

use crate::page::Page;

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// No page with the requested title.
    NotFound,
    /// Title does not match the title whitelist.
    InvalidTitle,
    /// Collection name is not a valid identifier.
    InvalidCollection,
    /// Backend is unavailable (connection refused, pool closed, I/O failure).
    Unavailable,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Title context (if applicable).
    pub title: Option<String>,
    /// Backend identifier (e.g., "Sqlite", "Memory").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            title: None,
            backend: None,
            source: None,
        }
    }

    /// Attach title context.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Attach a plain message as the error source.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let message: String = message.into();
        self.source = Some(message.into());
        self
    }

    /// Create a not found error for a title.
    #[must_use]
    pub fn not_found(title: impl Into<String>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_title(title)
    }

    /// Create an invalid title error.
    #[must_use]
    pub fn invalid_title(title: impl Into<String>) -> Self {
        Self::new(StorageErrorKind::InvalidTitle).with_title(title)
    }

    /// True if the error means the page is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (title: Foo)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Page not found",
            StorageErrorKind::InvalidTitle => "Invalid page title",
            StorageErrorKind::InvalidCollection => "Invalid collection name",
            StorageErrorKind::Unavailable => "Unavailable",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(title) = &self.title {
            write!(f, " (title: {title})")?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Storage abstraction for the page collection.
///
/// Implementations are shared across request handlers behind an `Arc` and
/// must be safe to call concurrently. No locking is done above this trait;
/// each operation relies on the backend's per-document atomicity.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Insert or fully replace the page with `page.title`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the title is invalid or the write fails.
    async fn save(&self, page: &Page) -> Result<(), StorageError>;

    /// Remove the page with the given title.
    ///
    /// Removing a title that does not exist is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the delete fails.
    async fn delete(&self, title: &str) -> Result<(), StorageError>;

    /// Load the page with the given title.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::NotFound`] if no page matches, or another
    /// [`StorageError`] if the read fails.
    async fn load(&self, title: &str) -> Result<Page, StorageError>;

    /// Return all page titles in backend-defined order.
    ///
    /// An empty collection yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the read fails.
    async fn list(&self) -> Result<Vec<String>, StorageError>;

    /// Check that the backend is reachable.
    ///
    /// Default implementation always succeeds, for backends without a
    /// connection to check.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be reached.
    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_new() {
        let err = StorageError::new(StorageErrorKind::Unavailable);

        assert_eq!(err.kind, StorageErrorKind::Unavailable);
        assert!(err.title.is_none());
        assert!(err.backend.is_none());
    }

    #[test]
    fn test_storage_error_not_found() {
        let err = StorageError::not_found("Foo");

        assert!(err.is_not_found());
        assert_eq!(err.title.as_deref(), Some("Foo"));
    }

    #[test]
    fn test_storage_error_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = StorageError::new(StorageErrorKind::Unavailable).with_source(io_err);

        let source = std::error::Error::source(&err).unwrap();
        assert!(source.downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn test_storage_error_display_simple() {
        let err = StorageError::new(StorageErrorKind::Other);

        assert_eq!(err.to_string(), "Error");
    }

    #[test]
    fn test_storage_error_display_with_backend() {
        let err = StorageError::not_found("Foo").with_backend("Sqlite");

        assert_eq!(err.to_string(), "[Sqlite] Page not found (title: Foo)");
    }

    #[test]
    fn test_storage_error_display_full() {
        let err = StorageError::new(StorageErrorKind::Unavailable)
            .with_backend("Memory")
            .with_message("connection lost")
            .with_title("Foo");

        assert_eq!(
            err.to_string(),
            "[Memory] Unavailable: connection lost (title: Foo)"
        );
    }

    #[test]
    fn test_storage_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StorageError>();
    }
}
