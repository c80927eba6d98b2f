//! Notification controller
//!
//! Owns the single in-flight prompt, its countdown, and the resolution
//! actions. One instance per page load; collaborators hold it by `Arc`
//! rather than reaching for ambient globals.
//!
//! Every resolution disarms the countdown before any other effect, so a
//! timeout tick can never fire after the user already chose.

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use popguard_trust::{registrable_domain, TrustStore};

use crate::request::{OpenFn, PendingRequest};
use crate::state::InterceptionState;
use crate::timer::{CountdownTimer, TimerHandle};
use crate::view::PromptView;
use crate::{EngineError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationState {
    /// No prompt is visible
    Hidden,
    /// Exactly one prompt is visible
    Visible {
        remaining_seconds: u32,
        pending_request: PendingRequest,
        blocked_count: u32,
    },
}

impl NotificationState {
    pub fn is_visible(&self) -> bool {
        matches!(self, NotificationState::Visible { .. })
    }
}

/// What a delivered tick amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Countdown decremented, this many seconds left
    Counting(u32),
    /// Countdown reached zero, the prompt resolved to timeout-deny
    Expired,
    /// The handle belongs to a cancelled countdown, nothing happened
    Stale,
}

struct Inner {
    notification: NotificationState,
    timer: CountdownTimer,
}

pub struct NotificationController {
    inner: Mutex<Inner>,
    native_open: Arc<dyn OpenFn>,
    trust: TrustStore,
    interception: Arc<RwLock<InterceptionState>>,
    hostname: String,
    domain: String,
    timeout_seconds: u32,
}

impl NotificationController {
    pub fn new(
        hostname: &str,
        native_open: Arc<dyn OpenFn>,
        trust: TrustStore,
        interception: Arc<RwLock<InterceptionState>>,
        timeout_seconds: u32,
    ) -> Self {
        Self {
            inner: Mutex::new(Inner {
                notification: NotificationState::Hidden,
                timer: CountdownTimer::new(),
            }),
            native_open,
            trust,
            interception,
            hostname: hostname.to_string(),
            domain: registrable_domain(hostname),
            timeout_seconds,
        }
    }

    /// Route a freshly blocked request into the prompt.
    ///
    /// A hidden prompt becomes visible with a full countdown; a visible
    /// one swallows the new request, bumps the count and restarts the
    /// countdown. There is never a second concurrent prompt.
    ///
    /// Returns the handle the host must carry on its 1 Hz ticks; any
    /// previously issued handle is dead from here on.
    pub fn show(&self, request: PendingRequest) -> TimerHandle {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        match &mut inner.notification {
            slot @ NotificationState::Hidden => {
                tracing::info!(url = %request.request.url, "Popup prompt shown");
                *slot = NotificationState::Visible {
                    remaining_seconds: self.timeout_seconds,
                    pending_request: request,
                    blocked_count: 1,
                };
            }
            NotificationState::Visible {
                remaining_seconds,
                pending_request,
                blocked_count,
            } => {
                *pending_request = request;
                *blocked_count += 1;
                *remaining_seconds = self.timeout_seconds;
                tracing::info!(
                    blocked_count = *blocked_count,
                    "Popup prompt updated, countdown restarted"
                );
            }
        }

        inner.timer.arm()
    }

    /// Deliver one 1 Hz countdown tick. Ticks carrying a stale handle
    /// are ignored, which is what makes a cancelled countdown harmless.
    pub fn tick(&self, handle: TimerHandle) -> TickOutcome {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if !inner.timer.accepts(handle) {
            return TickOutcome::Stale;
        }

        let remaining = match &mut inner.notification {
            NotificationState::Visible {
                remaining_seconds, ..
            } => {
                *remaining_seconds = remaining_seconds.saturating_sub(1);
                *remaining_seconds
            }
            NotificationState::Hidden => {
                // A live timer with no visible prompt is a bookkeeping
                // bug; disarm it rather than let it tick forever.
                inner.timer.cancel();
                return TickOutcome::Stale;
            }
        };

        if remaining > 0 {
            return TickOutcome::Counting(remaining);
        }

        inner.timer.cancel();
        let dropped = std::mem::replace(&mut inner.notification, NotificationState::Hidden);
        drop(guard);

        if let NotificationState::Visible {
            pending_request, ..
        } = dropped
        {
            tracing::info!(url = %pending_request.request.url, "Popup denied by timeout");
        }
        TickOutcome::Expired
    }

    /// Open the pending popup once without persisting trust.
    pub fn allow_once(&self) -> Result<()> {
        let pending = self.take_pending()?;
        let req = pending.request;

        tracing::info!(url = %req.url, "Popup allowed once");
        self.native_open
            .open(&req.url, req.target.as_deref(), req.features.as_deref());
        Ok(())
    }

    /// Persist trust for the page's domain, uninstall the guard for the
    /// rest of the page's life, and open the pending popup.
    pub fn always_allow(&self) -> Result<()> {
        let pending = self.take_pending()?;

        self.trust.set_trusted(&self.domain);

        {
            let mut state = self.interception.write();
            if state.can_transition_to(InterceptionState::PassThrough) {
                *state = InterceptionState::PassThrough;
            }
        }

        let req = pending.request;
        tracing::info!(domain = %self.domain, url = %req.url, "Domain trusted, popup allowed");
        self.native_open
            .open(&req.url, req.target.as_deref(), req.features.as_deref());
        Ok(())
    }

    /// Drop the pending popup. The page stays guarded; the next attempt
    /// will prompt again.
    pub fn deny(&self) -> Result<()> {
        let pending = self.take_pending()?;
        tracing::info!(url = %pending.request.url, "Popup denied");
        Ok(())
    }

    /// Current notification state snapshot.
    pub fn state(&self) -> NotificationState {
        self.inner.lock().notification.clone()
    }

    /// Handle for the live countdown, if a prompt is visible.
    pub fn timer_handle(&self) -> Option<TimerHandle> {
        self.inner.lock().timer.current()
    }

    /// Render-ready snapshot of the visible prompt, if any.
    pub fn view(&self) -> Option<PromptView> {
        let inner = self.inner.lock();
        match &inner.notification {
            NotificationState::Visible {
                remaining_seconds,
                pending_request,
                blocked_count,
            } => Some(PromptView::new(
                &self.hostname,
                &pending_request.request.url,
                *blocked_count,
                *remaining_seconds,
            )),
            NotificationState::Hidden => None,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Hide the prompt and hand back its pending request. The countdown
    /// is disarmed before the lock is released, so no tick can race the
    /// resolution that follows.
    fn take_pending(&self) -> Result<PendingRequest> {
        let mut inner = self.inner.lock();

        inner.timer.cancel();

        match std::mem::replace(&mut inner.notification, NotificationState::Hidden) {
            NotificationState::Visible {
                pending_request, ..
            } => Ok(pending_request),
            NotificationState::Hidden => Err(EngineError::NoPendingPrompt),
        }
    }
}
