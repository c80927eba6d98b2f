//! Blocker facade
//!
//! `Blocker` is profile-scoped: it owns the trust store and the set of
//! live page sessions. `PageSession` is page-scoped: one interception
//! state machine and one notification controller per page load,
//! constructed once and shared by handle with host callbacks.

use parking_lot::RwLock;
use std::sync::Arc;
use url::Url;

use popguard_engine::{
    InterceptionState, NotificationController, OpenFn, OpenInterceptor,
};
use popguard_storage::Database;
use popguard_trust::{registrable_domain, StorageBackend, TrustRecord, TrustStore};

use crate::config::Config;
use crate::menu::MenuHost;
use crate::{CoreError, Result};

pub struct PageSession {
    hostname: String,
    domain: String,
    controller: Arc<NotificationController>,
    interceptor: Arc<OpenInterceptor>,
}

impl PageSession {
    fn new(
        hostname: &str,
        native_open: Arc<dyn OpenFn>,
        trust: TrustStore,
        prompt_timeout_secs: u32,
    ) -> Self {
        let state = Arc::new(RwLock::new(InterceptionState::Uninitialized));

        let controller = Arc::new(NotificationController::new(
            hostname,
            native_open.clone(),
            trust.clone(),
            state.clone(),
            prompt_timeout_secs,
        ));

        let interceptor = Arc::new(OpenInterceptor::new(
            hostname,
            native_open,
            trust,
            controller.clone(),
            state,
        ));

        Self {
            hostname: hostname.to_string(),
            domain: registrable_domain(hostname),
            controller,
            interceptor,
        }
    }

    /// Re-run the trust evaluation. No-op while guarding; resumes
    /// guarding from pass-through once trust has been revoked.
    pub fn initialize(&self) -> InterceptionState {
        self.interceptor.initialize()
    }

    /// The guarded open capability the host installs in place of the
    /// native one.
    pub fn interceptor(&self) -> Arc<OpenInterceptor> {
        self.interceptor.clone()
    }

    pub fn controller(&self) -> &Arc<NotificationController> {
        &self.controller
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }
}

pub struct Blocker {
    trust: TrustStore,
    prompt_timeout_secs: u32,
    sessions: RwLock<Vec<Arc<PageSession>>>,
}

impl Blocker {
    /// Open (or create) the profile's trust database and build the
    /// blocker around it.
    pub fn new(config: Config) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        Ok(Self::with_backend(
            Arc::new(db),
            config.prompt_timeout_secs,
        ))
    }

    /// Blocker over an injected backend, used by tests and ephemeral
    /// profiles.
    pub fn with_backend(backend: Arc<dyn StorageBackend>, prompt_timeout_secs: u32) -> Self {
        Self {
            trust: TrustStore::new(backend),
            prompt_timeout_secs,
            sessions: RwLock::new(Vec::new()),
        }
    }

    /// Start a session for a freshly loaded page and run the initial
    /// trust evaluation.
    pub fn open_page(
        &self,
        page_url: &str,
        native_open: Arc<dyn OpenFn>,
    ) -> Result<Arc<PageSession>> {
        let parsed =
            Url::parse(page_url).map_err(|_| CoreError::InvalidPageUrl(page_url.to_string()))?;
        let hostname = parsed
            .host_str()
            .ok_or_else(|| CoreError::InvalidPageUrl(page_url.to_string()))?;

        let session = Arc::new(PageSession::new(
            hostname,
            native_open,
            self.trust.clone(),
            self.prompt_timeout_secs,
        ));
        session.initialize();

        tracing::info!(hostname = %hostname, domain = %session.domain(), "Page session opened");

        self.sessions.write().push(session.clone());
        Ok(session)
    }

    /// Drop a session when its page goes away.
    pub fn close_page(&self, session: &Arc<PageSession>) {
        self.sessions
            .write()
            .retain(|s| !Arc::ptr_eq(s, session));
    }

    pub fn list_trusted(&self) -> Vec<String> {
        self.trust.list_trusted()
    }

    pub fn trusted_records(&self) -> Vec<TrustRecord> {
        self.trust.records()
    }

    /// Trusted domains serialized for an editor surface.
    pub fn trusted_domains_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.trust.records())?)
    }

    /// Manually trust a domain from the editor. The input is reduced to
    /// its registrable domain before storing.
    pub fn add_trusted(&self, domain: &str) {
        self.trust.set_trusted(&registrable_domain(domain));
    }

    /// Revoke trust for a domain. Live sessions on that domain re-run
    /// their trust evaluation, so guarding resumes without a reload.
    pub fn remove_trusted(&self, domain: &str) {
        let domain = registrable_domain(domain);
        self.trust.remove(&domain);

        for session in self.sessions.read().iter() {
            if session.domain() == domain {
                session.initialize();
            }
        }
    }

    /// Register the single host menu entry that surfaces the editor.
    pub fn install_menu(&self, host: &mut dyn MenuHost) {
        let trust = self.trust.clone();
        host.register_command(
            "Popup Blocker: Trusted domains",
            Box::new(move || {
                let domains = trust.list_trusted();
                tracing::info!(count = domains.len(), "Trusted domains editor requested");
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::MenuAction;
    use parking_lot::Mutex;
    use popguard_engine::{
        InertWindow, NotificationState, OpenRequest, TickOutcome, WindowLike, TIMEOUT_SECONDS,
    };
    use popguard_trust::MemoryBackend;

    #[derive(Default)]
    struct RecordingOpen {
        calls: Mutex<Vec<OpenRequest>>,
    }

    impl RecordingOpen {
        fn call_count(&self) -> usize {
            self.calls.lock().len()
        }
    }

    impl OpenFn for RecordingOpen {
        fn open(
            &self,
            url: &str,
            target: Option<&str>,
            features: Option<&str>,
        ) -> Box<dyn WindowLike> {
            self.calls.lock().push(OpenRequest {
                url: url.to_string(),
                target: target.map(str::to_string),
                features: features.map(str::to_string),
            });
            Box::new(InertWindow)
        }
    }

    fn blocker() -> Blocker {
        Blocker::with_backend(Arc::new(MemoryBackend::new()), TIMEOUT_SECONDS)
    }

    fn blocked_count(session: &PageSession) -> u32 {
        match session.controller().state() {
            NotificationState::Visible { blocked_count, .. } => blocked_count,
            NotificationState::Hidden => 0,
        }
    }

    #[test]
    fn test_untrusted_page_starts_guarding() {
        let blocker = blocker();
        let native = Arc::new(RecordingOpen::default());

        let session = blocker
            .open_page("https://shop.example.com/deals", native.clone())
            .unwrap();

        assert_eq!(session.domain(), "example.com");
        assert_eq!(session.initialize(), InterceptionState::Guarding);
    }

    #[test]
    fn test_invalid_page_url_is_rejected() {
        let blocker = blocker();
        let native = Arc::new(RecordingOpen::default());

        assert!(matches!(
            blocker.open_page("not a url", native.clone()),
            Err(CoreError::InvalidPageUrl(_))
        ));
        assert!(matches!(
            blocker.open_page("data:text/plain,hi", native),
            Err(CoreError::InvalidPageUrl(_))
        ));
    }

    #[test]
    fn test_blocked_popup_scenario() {
        // Untrusted page opens three popups in quick succession, the
        // user denies at t=7s: no window is ever opened.
        let blocker = blocker();
        let native = Arc::new(RecordingOpen::default());

        let session = blocker
            .open_page("https://shop.example.com/deals", native.clone())
            .unwrap();
        let interceptor = session.interceptor();
        let controller = session.controller();

        // t=0s
        interceptor.open("https://ads.invalid/one", None, None);
        let mut handle = controller.timer_handle().unwrap();

        // t=2s
        for _ in 0..2 {
            controller.tick(handle);
        }
        interceptor.open("https://ads.invalid/two", None, None);
        handle = controller.timer_handle().unwrap();

        // t=5s
        for _ in 0..3 {
            controller.tick(handle);
        }
        interceptor.open("https://ads.invalid/three", None, None);
        handle = controller.timer_handle().unwrap();

        assert_eq!(blocked_count(session.as_ref()), 3);
        match controller.state() {
            NotificationState::Visible {
                remaining_seconds, ..
            } => assert_eq!(remaining_seconds, TIMEOUT_SECONDS),
            NotificationState::Hidden => panic!("prompt should be visible"),
        }

        // t=7s: user clicks deny
        for _ in 0..2 {
            controller.tick(handle);
        }
        controller.deny().unwrap();

        assert_eq!(controller.state(), NotificationState::Hidden);
        assert_eq!(blocked_count(session.as_ref()), 0);
        assert_eq!(native.call_count(), 0);

        // The leftover tick after deny is stale
        assert_eq!(controller.tick(handle), TickOutcome::Stale);
    }

    #[test]
    fn test_always_allow_then_new_page_passes_through() {
        let blocker = blocker();
        let native = Arc::new(RecordingOpen::default());

        let session = blocker
            .open_page("https://shop.example.com/deals", native.clone())
            .unwrap();
        session.interceptor().open("https://ads.invalid", None, None);
        session.controller().always_allow().unwrap();

        assert_eq!(blocker.list_trusted(), vec!["example.com"]);
        assert_eq!(native.call_count(), 1);

        // A later page load on the same domain selects pass-through
        let next = blocker
            .open_page("https://www.example.com/", native.clone())
            .unwrap();
        assert_eq!(next.initialize(), InterceptionState::PassThrough);

        next.interceptor().open("https://ads.invalid/again", None, None);
        assert_eq!(native.call_count(), 2);
    }

    #[test]
    fn test_remove_trusted_resumes_guarding_without_reload() {
        let blocker = blocker();
        blocker.add_trusted("www.example.com");

        let native = Arc::new(RecordingOpen::default());
        let session = blocker
            .open_page("https://shop.example.com/", native.clone())
            .unwrap();
        assert_eq!(session.interceptor().state(), InterceptionState::PassThrough);

        blocker.remove_trusted("example.com");

        // No reload needed: the live session is guarding again
        assert_eq!(session.interceptor().state(), InterceptionState::Guarding);
        session.interceptor().open("https://ads.invalid", None, None);
        assert_eq!(native.call_count(), 0);
    }

    #[test]
    fn test_closed_page_is_not_reinitialized() {
        let blocker = blocker();
        blocker.add_trusted("example.com");

        let native = Arc::new(RecordingOpen::default());
        let session = blocker
            .open_page("https://example.com/", native)
            .unwrap();
        blocker.close_page(&session);

        blocker.remove_trusted("example.com");
        // Sessions list no longer holds it; state is whatever it was
        assert_eq!(session.interceptor().state(), InterceptionState::PassThrough);
    }

    #[test]
    fn test_trusted_domains_json() {
        let blocker = blocker();
        blocker.add_trusted("shop.example.com");

        let json = blocker.trusted_domains_json().unwrap();
        assert_eq!(json, r#"[{"domain":"example.com","trusted":true}]"#);
    }

    #[derive(Default)]
    struct FakeMenuHost {
        commands: Vec<(String, MenuAction)>,
    }

    impl MenuHost for FakeMenuHost {
        fn register_command(&mut self, label: &str, action: MenuAction) {
            self.commands.push((label.to_string(), action));
        }
    }

    #[test]
    fn test_single_menu_command_registered() {
        let blocker = blocker();
        let mut host = FakeMenuHost::default();

        blocker.install_menu(&mut host);

        assert_eq!(host.commands.len(), 1);
        assert_eq!(host.commands[0].0, "Popup Blocker: Trusted domains");
        // Invoking the action must not panic even with an empty list
        (host.commands[0].1)();
    }
}
