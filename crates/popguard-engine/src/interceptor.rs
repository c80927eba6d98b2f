//! Open interceptor
//!
//! Stands in front of the page's window-opening capability. Once
//! initialized for an untrusted domain, every open call is swallowed,
//! counted and routed to the notification controller; the caller gets
//! an inert placeholder window, never the real handle.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use popguard_trust::{registrable_domain, TrustStore};

use crate::notification::NotificationController;
use crate::request::{InertWindow, OpenFn, OpenRequest, PendingRequest, WindowLike};
use crate::state::InterceptionState;

pub struct OpenInterceptor {
    state: Arc<RwLock<InterceptionState>>,
    native_open: Arc<dyn OpenFn>,
    controller: Arc<NotificationController>,
    trust: TrustStore,
    domain: String,
    /// Popups blocked over the whole page session, monotone
    blocked_total: AtomicU64,
    sequence: AtomicU64,
}

impl OpenInterceptor {
    pub fn new(
        hostname: &str,
        native_open: Arc<dyn OpenFn>,
        trust: TrustStore,
        controller: Arc<NotificationController>,
        state: Arc<RwLock<InterceptionState>>,
    ) -> Self {
        Self {
            state,
            native_open,
            controller,
            trust,
            domain: registrable_domain(hostname),
            blocked_total: AtomicU64::new(0),
            sequence: AtomicU64::new(0),
        }
    }

    /// Evaluate trust for the page's domain and install or remove the
    /// guard accordingly.
    ///
    /// Calling this while already guarding is a no-op: the guard is
    /// never double-wrapped. From pass-through it re-evaluates trust,
    /// so a revoked domain resumes guarding without a reload.
    pub fn initialize(&self) -> InterceptionState {
        // Storage round-trip before taking the lock; the trust store
        // swallows failures, reading as untrusted.
        let trusted = self.trust.is_trusted(&self.domain);

        let mut state = self.state.write();

        if state.is_guarding() {
            tracing::debug!(domain = %self.domain, "Already guarding, initialize is a no-op");
            return *state;
        }

        let target = if trusted {
            InterceptionState::PassThrough
        } else {
            InterceptionState::Guarding
        };

        if *state != target && state.can_transition_to(target) {
            tracing::info!(domain = %self.domain, state = %target, "Interceptor initialized");
            *state = target;
        }

        *state
    }

    pub fn state(&self) -> InterceptionState {
        *self.state.read()
    }

    /// Popups blocked since the page loaded.
    pub fn blocked_total(&self) -> u64 {
        self.blocked_total.load(Ordering::Relaxed)
    }
}

impl OpenFn for OpenInterceptor {
    fn open(
        &self,
        url: &str,
        target: Option<&str>,
        features: Option<&str>,
    ) -> Box<dyn WindowLike> {
        let state = *self.state.read();

        match state {
            InterceptionState::Guarding => {
                let total = self.blocked_total.fetch_add(1, Ordering::Relaxed) + 1;
                let sequence_number = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;

                tracing::info!(url = %url, blocked_total = total, "Popup blocked");

                self.controller.show(PendingRequest {
                    request: OpenRequest {
                        url: url.to_string(),
                        target: target.map(str::to_string),
                        features: features.map(str::to_string),
                    },
                    sequence_number,
                });

                Box::new(InertWindow)
            }
            // Before initialization and after always-allow the native
            // capability is the one in effect.
            InterceptionState::PassThrough | InterceptionState::Uninitialized => {
                self.native_open.open(url, target, features)
            }
        }
    }
}
