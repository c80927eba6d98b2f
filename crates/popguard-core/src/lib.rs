//! Popguard Core
//!
//! Coordination layer for the popup blocker: wires the persisted trust
//! store to per-page interception sessions and exposes the
//! trusted-domains editing surface to whatever UI the host provides.

mod blocker;
mod config;
mod error;
mod menu;

pub use blocker::{Blocker, PageSession};
pub use config::Config;
pub use error::CoreError;
pub use menu::{MenuAction, MenuHost};

// Re-export core components
pub use popguard_engine::{
    EngineError, InertWindow, InterceptionState, NotificationController, NotificationState,
    OpenFn, OpenInterceptor, OpenRequest, PendingRequest, PromptView, TickOutcome, TimerHandle,
    WindowLike, TIMEOUT_SECONDS,
};
pub use popguard_storage::{Database, StorageError};
pub use popguard_trust::{
    registrable_domain, MemoryBackend, StorageBackend, TrustError, TrustRecord, TrustStore,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
