//! Engine error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No prompt is visible, nothing to resolve")]
    NoPendingPrompt,
}
