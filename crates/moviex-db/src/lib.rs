//! Local storage for moviex.
//!
//! Resolves where the config file and database live, and provides the
//! `rusqlite` (bundled `SQLite`) key-value backend the favorites store
//! persists into.

/// `SQLite` key-value store.
pub mod kv;
mod layout;
mod migrations;

pub use kv::SqliteKvStore;
pub use layout::StorageLayout;
