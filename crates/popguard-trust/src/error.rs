//! Trust error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrustError {
    #[error("Storage error: {0}")]
    Storage(#[from] popguard_storage::StorageError),

    #[error("Storage backend error: {0}")]
    Backend(String),
}
