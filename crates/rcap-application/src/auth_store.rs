//! Sign-in, sign-out and token refresh.

use rcap_core::envelope::Envelope;
use rcap_core::error::{RcapError, Result};
use rcap_core::session::{
    AuthPayload, Credentials, RegistrationData, Session, SessionEvent, SessionHandle, SessionState,
    TokenPayload,
};
use rcap_core::user::{OrganisationRef, Role, User};
use rcap_interaction::{ApiClient, ApiRequest};
use std::sync::Arc;

/// Drives the session lifecycle against the auth endpoints.
///
/// The token and user themselves live in the [`SessionHandle`]; this store
/// only decides which lifecycle event each server answer produces.
pub struct AuthStore {
    client: Arc<ApiClient>,
}

impl AuthStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    fn handle(&self) -> &Arc<SessionHandle> {
        self.client.session()
    }

    // ============================================================================
    // Getters
    // ============================================================================

    pub async fn is_authenticated(&self) -> bool {
        self.handle().is_authenticated().await
    }

    pub async fn user_role(&self) -> Option<Role> {
        self.handle().role().await
    }

    pub async fn user_organisation(&self) -> Option<OrganisationRef> {
        self.handle().organisation().await
    }

    pub async fn user(&self) -> Option<User> {
        self.handle().user().await
    }

    pub async fn session(&self) -> Option<Session> {
        self.handle().snapshot().await
    }

    // ============================================================================
    // Actions
    // ============================================================================

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthPayload> {
        tracing::info!("[AuthStore] Logging in as {}", credentials.email);
        self.authenticate("/auth/login", credentials).await
    }

    pub async fn register(&self, data: &RegistrationData) -> Result<AuthPayload> {
        tracing::info!("[AuthStore] Registering {}", data.email);
        self.authenticate("/auth/register", data).await
    }

    async fn authenticate<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<AuthPayload> {
        self.handle().begin_authentication()?;

        match self.client.post::<Envelope<AuthPayload>, _>(path, body).await {
            Ok(payload) => {
                let payload = payload.into_inner();
                self.handle()
                    .establish(payload.token.clone(), payload.user.clone())
                    .await?;
                tracing::info!(
                    "[AuthStore] Signed in as user {} ({})",
                    payload.user.id,
                    payload.user.role
                );
                Ok(payload)
            }
            Err(e) => {
                self.discard_session(SessionEvent::Rejected).await;
                Err(e)
            }
        }
    }

    /// Signs out on the server, then always clears the local session.
    ///
    /// Server failures are ignored; only a failure to clear the stored
    /// token is reported.
    pub async fn logout(&self) -> Result<()> {
        self.sign_out(SessionEvent::LoggedOut).await
    }

    async fn sign_out(&self, event: SessionEvent) -> Result<()> {
        if let Err(e) = self.client.call(ApiRequest::post("/auth/logout")).await {
            tracing::debug!("[AuthStore] Ignoring logout failure: {}", e);
        }
        self.handle().end(event).await?;
        tracing::info!("[AuthStore] Signed out");
        Ok(())
    }

    /// Reloads the signed-in user; any failure ends the session.
    ///
    /// A session that only holds a stored token is completed here, so a
    /// later refresh finds it authenticated.
    pub async fn fetch_user(&self) -> Result<User> {
        if self.handle().state() == SessionState::Anonymous {
            let token = self.handle().token().await.ok_or(RcapError::NotAuthenticated)?;
            return self.adopt_token(token).await;
        }

        match self.client.get::<Envelope<User>>("/users/me").await {
            Ok(user) => {
                let user = user.into_inner();
                self.handle().set_user(user.clone()).await;
                Ok(user)
            }
            Err(e) => {
                self.discard_session(SessionEvent::Rejected).await;
                Err(e)
            }
        }
    }

    /// Exchanges the current token for a fresh one; failure signs the user out.
    pub async fn refresh_token(&self) -> Result<TokenPayload> {
        self.handle().begin_refresh()?;

        match self
            .client
            .post_empty::<Envelope<TokenPayload>>("/auth/refresh")
            .await
        {
            Ok(payload) => {
                let payload = payload.into_inner();
                self.handle().replace_token(payload.token.clone()).await?;
                tracing::debug!("[AuthStore] Token refreshed");
                Ok(payload)
            }
            Err(e) => {
                tracing::warn!("[AuthStore] Token refresh rejected: {}", e);
                if let Err(clear) = self.sign_out(SessionEvent::RefreshRejected).await {
                    tracing::error!("[AuthStore] Failed to clear session: {}", clear);
                }
                Err(e)
            }
        }
    }

    /// Picks up a session left by a previous run.
    ///
    /// Returns whether a user was restored. Failures are logged and leave the
    /// session anonymous; they are never returned.
    pub async fn restore(&self) -> bool {
        let Some(token) = self.handle().token().await else {
            return false;
        };

        match self.adopt_token(token).await {
            Ok(_) => {
                tracing::info!("[AuthStore] Session restored");
                true
            }
            Err(e) => {
                tracing::warn!("[AuthStore] Session restore failed: {}", e);
                false
            }
        }
    }

    /// Authenticates with a token already held by the session by loading
    /// its user. On failure the session is discarded.
    async fn adopt_token(&self, token: String) -> Result<User> {
        self.handle().begin_authentication()?;

        let adopted = match self.client.get::<Envelope<User>>("/users/me").await {
            Ok(user) => {
                let user = user.into_inner();
                self.handle()
                    .establish(token, user.clone())
                    .await
                    .map(|()| user)
            }
            Err(e) => Err(e),
        };

        if adopted.is_err() {
            self.discard_session(SessionEvent::Rejected).await;
        }
        adopted
    }

    async fn discard_session(&self, event: SessionEvent) {
        if let Err(e) = self.handle().end(event).await {
            tracing::error!("[AuthStore] Failed to clear session: {}", e);
        }
    }
}
