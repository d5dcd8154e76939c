//! Page storage for the wiki.
//!
//! This crate provides a [`PageStore`] trait abstracting the document collection
//! that holds wiki pages. Every page is one document keyed by its title; saving
//! replaces the whole document (upsert), deleting removes it.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Page`] and title validation ([`is_valid_title`])
//! - [`PageStore`] trait with `save()`, `delete()`, `load()`, `list()` and `ping()`
//! - [`SqliteStore`], the persistent document store
//! - [`MemoryStore`] for tests and throwaway instances (behind `memory` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use wiki_storage::{Page, PageStore, SqliteStore};
//!
//! let store = SqliteStore::open("wiki.db", "pages").await?;
//! store.save(&Page::new("Foo", "hello")).await?;
//! let page = store.load("Foo").await?;
//! assert_eq!(page.body, b"hello");
//! ```

#[cfg(feature = "memory")]
mod memory;
mod page;
mod sqlite;
mod store;

#[cfg(feature = "memory")]
pub use memory::MemoryStore;
pub use page::{Page, is_valid_title};
pub use sqlite::{SqliteStore, is_valid_collection};
pub use store::{PageStore, StorageError, StorageErrorKind};
