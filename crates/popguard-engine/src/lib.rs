//! Popguard Engine
//!
//! The interception-and-decision core: overrides the page's
//! window-opening capability, tracks one pending popup request at a
//! time, runs a cancellable countdown, and resolves each request to
//! exactly one of allow-once, always-allow, deny or timeout-deny.
//!
//! The host injects the real open capability and drives the 1 Hz
//! countdown ticks; everything else is owned here.

mod error;
mod interceptor;
mod notification;
mod request;
mod state;
mod timer;
mod view;

pub use error::EngineError;
pub use interceptor::OpenInterceptor;
pub use notification::{NotificationController, NotificationState, TickOutcome};
pub use request::{InertWindow, OpenFn, OpenRequest, PendingRequest, WindowLike};
pub use state::InterceptionState;
pub use timer::TimerHandle;
pub use view::PromptView;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Seconds a prompt stays visible before it resolves to timeout-deny.
pub const TIMEOUT_SECONDS: u32 = 15;
