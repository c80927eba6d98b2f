//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] popguard_storage::StorageError),

    #[error("Trust error: {0}")]
    Trust(#[from] popguard_trust::TrustError),

    #[error("Engine error: {0}")]
    Engine(#[from] popguard_engine::EngineError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Page URL has no usable host: {0}")]
    InvalidPageUrl(String),
}
