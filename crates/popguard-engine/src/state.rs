//! Interceptor state machine
//!
//! ```text
//! Uninitialized
//!   ↓ initialize (domain trusted)     ↓ initialize (untrusted)
//! PassThrough  ←── always-allow ───  Guarding
//!      └────── trust revoked ──────────↑
//! ```
//!
//! A page session transitions out of `Uninitialized` exactly once and
//! never returns to it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterceptionState {
    /// No decision has been made for this page load yet
    Uninitialized,
    /// Native open capability left installed, untouched
    PassThrough,
    /// Replacement open function installed, every call routed through
    /// the decision engine
    Guarding,
}

impl InterceptionState {
    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, target: InterceptionState) -> bool {
        match (self, target) {
            // Initialization picks either mode
            (InterceptionState::Uninitialized, InterceptionState::PassThrough) => true,
            (InterceptionState::Uninitialized, InterceptionState::Guarding) => true,
            // Always-allow uninstalls the guard
            (InterceptionState::Guarding, InterceptionState::PassThrough) => true,
            // Revoking trust re-installs the guard without a reload
            (InterceptionState::PassThrough, InterceptionState::Guarding) => true,
            // Same state is always valid (no-op)
            (a, b) if *a == b => true,
            // Never back to Uninitialized
            _ => false,
        }
    }

    pub fn is_guarding(&self) -> bool {
        matches!(self, InterceptionState::Guarding)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InterceptionState::Uninitialized => "uninitialized",
            InterceptionState::PassThrough => "passthrough",
            InterceptionState::Guarding => "guarding",
        }
    }
}

impl std::fmt::Display for InterceptionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InterceptionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uninitialized" => Ok(InterceptionState::Uninitialized),
            "passthrough" => Ok(InterceptionState::PassThrough),
            "guarding" => Ok(InterceptionState::Guarding),
            _ => Err(format!("Unknown interception state: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        // Uninitialized -> either mode
        assert!(InterceptionState::Uninitialized.can_transition_to(InterceptionState::PassThrough));
        assert!(InterceptionState::Uninitialized.can_transition_to(InterceptionState::Guarding));
        // Guarding -> PassThrough (always-allow)
        assert!(InterceptionState::Guarding.can_transition_to(InterceptionState::PassThrough));
        // PassThrough -> Guarding (trust revoked)
        assert!(InterceptionState::PassThrough.can_transition_to(InterceptionState::Guarding));
    }

    #[test]
    fn test_never_back_to_uninitialized() {
        assert!(
            !InterceptionState::PassThrough.can_transition_to(InterceptionState::Uninitialized)
        );
        assert!(!InterceptionState::Guarding.can_transition_to(InterceptionState::Uninitialized));
    }

    #[test]
    fn test_round_trip_str() {
        for state in [
            InterceptionState::Uninitialized,
            InterceptionState::PassThrough,
            InterceptionState::Guarding,
        ] {
            assert_eq!(state.as_str().parse::<InterceptionState>(), Ok(state));
        }
    }
}
