//! Popguard Storage Layer
//!
//! SQLite-based persistence for the trust store. State is a flat set of
//! key-value pairs keyed by domain string, scoped to the browser profile
//! rather than to any visited site.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
