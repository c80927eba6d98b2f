//! Popup request types and the injected open capability

use serde::{Deserialize, Serialize};

/// Handle returned by the open capability. Popup originators commonly
/// call `focus()` or `blur()` on the return value, so even a blocked
/// request must yield something implementing this.
pub trait WindowLike {
    fn focus(&self) -> bool;
    fn blur(&self) -> bool;
}

/// The window-opening capability, injected by the host.
///
/// The `(url, target, features)` signature is preserved exactly for
/// pass-through and allow actions.
pub trait OpenFn: Send + Sync {
    fn open(
        &self,
        url: &str,
        target: Option<&str>,
        features: Option<&str>,
    ) -> Box<dyn WindowLike>;
}

/// Inert placeholder handed back for every blocked request. Never the
/// real window.
pub struct InertWindow;

impl WindowLike for InertWindow {
    fn focus(&self) -> bool {
        false
    }

    fn blur(&self) -> bool {
        false
    }
}

/// Arguments captured from one invocation of the guarded open function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenRequest {
    pub url: String,
    pub target: Option<String>,
    pub features: Option<String>,
}

impl OpenRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            target: None,
            features: None,
        }
    }
}

/// A blocked request awaiting a decision. Exists only while a prompt is
/// visible and is destroyed on resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequest {
    pub request: OpenRequest,
    pub sequence_number: u64,
}
