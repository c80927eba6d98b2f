//! Popguard Trust Policy
//!
//! Persisted per-domain trust decisions and the registrable-domain
//! resolver used as the trust key. The policy is fail-safe-closed: on
//! any storage uncertainty a domain is treated as untrusted.

mod domain;
mod error;
mod store;

pub use domain::registrable_domain;
pub use error::TrustError;
pub use store::{MemoryBackend, StorageBackend, TrustRecord, TrustStore};

pub type Result<T> = std::result::Result<T, TrustError>;
