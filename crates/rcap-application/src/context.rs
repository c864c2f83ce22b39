//! Composition root.

use crate::auth_store::AuthStore;
use crate::notification_poller::NotificationPoller;
use crate::notification_store::NotificationStore;
use crate::stores::{
    ActivityStore, AnalyticsStore, DashboardStore, HelpStore, MessageStore, OnboardingStore,
    OrganisationStore, TemplateStore, UserStore,
};
use rcap_core::config::ClientConfig;
use rcap_core::error::Result;
use rcap_core::feedback::{Navigator, Notifier};
use rcap_core::guard::{GuardContext, GuardDecision, evaluate};
use rcap_core::route::{ResolvedRoute, RouteTable};
use rcap_core::session::{SessionHandle, SessionState};
use rcap_infrastructure::{FileTokenStore, RcapPaths};
use rcap_interaction::{ApiClient, HttpTransport, ReqwestTransport};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Owns the client, the session, every store and the notification poller.
///
/// Nothing here is global: front ends build one context and pass it around.
pub struct AppContext {
    pub config: ClientConfig,
    pub session: Arc<SessionHandle>,
    pub client: Arc<ApiClient>,
    pub routes: RouteTable,
    pub auth: AuthStore,
    pub notifications: Arc<NotificationStore>,
    pub poller: Arc<NotificationPoller>,
    pub activities: ActivityStore,
    pub organisations: OrganisationStore,
    pub messages: MessageStore,
    pub templates: TemplateStore,
    pub help: HelpStore,
    pub dashboard: DashboardStore,
    pub onboarding: OnboardingStore,
    pub analytics: AnalyticsStore,
    pub users: UserStore,
    session_watch: Mutex<Option<CancellationToken>>,
}

impl AppContext {
    /// Wires every component around `transport` and `session`.
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
        session: Arc<SessionHandle>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let client = Arc::new(
            ApiClient::new(transport, session.clone(), notifier, navigator)
                .with_login_route(config.login_route.clone()),
        );
        let notifications = Arc::new(NotificationStore::new(client.clone()));
        let poller = Arc::new(NotificationPoller::new(
            notifications.clone(),
            config.poll_interval(),
        ));

        Self {
            session,
            routes: RouteTable::default(),
            auth: AuthStore::new(client.clone()),
            notifications,
            poller,
            activities: ActivityStore::new(client.clone()),
            organisations: OrganisationStore::new(client.clone()),
            messages: MessageStore::new(client.clone()),
            templates: TemplateStore::new(client.clone()),
            help: HelpStore::new(client.clone()),
            dashboard: DashboardStore::new(client.clone()),
            onboarding: OnboardingStore::new(client.clone()),
            analytics: AnalyticsStore::new(client.clone()),
            users: UserStore::new(client.clone()),
            client,
            config,
            session_watch: Mutex::new(None),
        }
    }

    /// Builds a context that talks HTTP and keeps its token under `paths`.
    pub async fn bootstrap(
        config: ClientConfig,
        paths: &RcapPaths,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        tracing::info!("[Bootstrap] API at {}", config.api_url);
        let tokens = Arc::new(FileTokenStore::new(paths.session_file()));
        let session = Arc::new(SessionHandle::rehydrate(tokens).await?);
        let transport = Arc::new(ReqwestTransport::from_config(&config)?);

        Ok(Self::new(config, transport, session, notifier, navigator))
    }

    /// Restores a persisted session and, once signed in, starts polling.
    ///
    /// Returns whether a user is signed in afterwards.
    pub async fn start(&self) -> bool {
        self.auth.restore().await;
        let signed_in = self.session.is_authenticated().await;
        if signed_in {
            self.start_polling();
        }
        signed_in
    }

    /// Starts the poller and stops it again when the session ends.
    pub fn start_polling(&self) {
        self.poller.start();

        let mut watch = self
            .session_watch
            .lock()
            .unwrap_or_else(|p| p.into_inner());
        if watch.as_ref().is_some_and(|cancel| !cancel.is_cancelled()) {
            return;
        }

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let poller = self.poller.clone();
        let mut states = self.session.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    changed = states.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        if *states.borrow_and_update() == SessionState::Anonymous {
                            tracing::info!("[AppContext] Session ended, stopping notification polling");
                            poller.stop();
                            break;
                        }
                    }
                }
            }
            token.cancel();
        });
        *watch = Some(cancel);
    }

    pub fn stop(&self) {
        if let Some(cancel) = self
            .session_watch
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take()
        {
            cancel.cancel();
        }
        self.poller.stop();
    }

    /// Resolves `path` and runs the navigation guards against the current session.
    pub async fn check_route(&self, path: &str) -> (ResolvedRoute, GuardDecision) {
        let resolved = self.routes.resolve(path);
        let ctx = GuardContext::from_session(&self.session).await;
        let decision = evaluate(&resolved, &ctx);
        (resolved, decision)
    }
}

impl Drop for AppContext {
    fn drop(&mut self) {
        self.stop();
    }
}
