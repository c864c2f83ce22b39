use super::model::Session;
use super::state::{SessionEvent, SessionState};
use super::token::TokenStore;
use crate::error::{RcapError, Result};
use crate::user::{OrganisationRef, Role, User};
use std::sync::Arc;
use tokio::sync::{RwLock, watch};

#[derive(Debug, Default)]
struct SessionSlot {
    token: Option<String>,
    user: Option<User>,
}

/// Owner of the bearer token and the current user.
///
/// `SessionHandle` is the single writer for the token: the API client reads
/// it on every request, while login, refresh, logout and 401 handling all
/// write through the methods below. In-memory state is updated first and
/// then mirrored to the [`TokenStore`].
///
/// Lifecycle changes are published on a watch channel so that owners of the
/// application lifecycle (pollers, UI shells) can react to a forced logout.
pub struct SessionHandle {
    slot: RwLock<SessionSlot>,
    state_tx: watch::Sender<SessionState>,
    tokens: Arc<dyn TokenStore>,
}

impl SessionHandle {
    /// Creates an anonymous session backed by `tokens`.
    pub fn new(tokens: Arc<dyn TokenStore>) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Anonymous);
        Self {
            slot: RwLock::new(SessionSlot::default()),
            state_tx,
            tokens,
        }
    }

    /// Creates a session seeded with whatever token the store still holds.
    ///
    /// The session stays `anonymous` until the user behind the token has been
    /// fetched; the token is nevertheless attached to outgoing requests so
    /// that the fetch can succeed.
    pub async fn rehydrate(tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let token = tokens.load().await?;
        let handle = Self::new(tokens);
        if let Some(token) = token {
            tracing::debug!("[SessionHandle] Rehydrated persisted bearer token");
            handle.slot.write().await.token = Some(token);
        }
        Ok(handle)
    }

    // ============================================================================
    // Readers
    // ============================================================================

    pub async fn token(&self) -> Option<String> {
        self.slot.read().await.token.clone()
    }

    pub async fn user(&self) -> Option<User> {
        self.slot.read().await.user.clone()
    }

    pub async fn role(&self) -> Option<Role> {
        self.slot.read().await.user.as_ref().map(|user| user.role)
    }

    pub async fn organisation(&self) -> Option<OrganisationRef> {
        self.slot
            .read()
            .await
            .user
            .as_ref()
            .and_then(|user| user.organisation.clone())
    }

    /// True when both a token and a user are present.
    pub async fn is_authenticated(&self) -> bool {
        let slot = self.slot.read().await;
        slot.token.is_some() && slot.user.is_some()
    }

    pub async fn snapshot(&self) -> Option<Session> {
        let slot = self.slot.read().await;
        match (&slot.token, &slot.user) {
            (Some(token), Some(user)) => Some(Session::new(user, token.clone())),
            _ => None,
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state_tx.borrow()
    }

    /// Subscribes to lifecycle changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    // ============================================================================
    // Writers
    // ============================================================================

    /// Marks the start of a login, register or boot-time restore.
    pub fn begin_authentication(&self) -> Result<()> {
        self.advance(SessionEvent::Authenticate).map(|_| ())
    }

    /// Stores the token and user of a successful authentication.
    pub async fn establish(&self, token: String, user: User) -> Result<()> {
        self.advance(SessionEvent::Established)?;
        {
            let mut slot = self.slot.write().await;
            slot.token = Some(token.clone());
            slot.user = Some(user);
        }
        self.tokens.save(&token).await
    }

    /// Replaces the cached user without touching the lifecycle state.
    pub async fn set_user(&self, user: User) {
        self.slot.write().await.user = Some(user);
    }

    pub fn begin_refresh(&self) -> Result<()> {
        self.advance(SessionEvent::RefreshStarted).map(|_| ())
    }

    /// Stores a refreshed token.
    pub async fn replace_token(&self, token: String) -> Result<()> {
        self.advance(SessionEvent::Refreshed)?;
        self.slot.write().await.token = Some(token.clone());
        self.tokens.save(&token).await
    }

    /// Ends the session: token and user are dropped in memory and in storage.
    ///
    /// Only terminal events are accepted here.
    pub async fn end(&self, event: SessionEvent) -> Result<()> {
        if !event.is_terminal() {
            return Err(RcapError::InvalidTransition {
                from: self.state().to_string(),
                event: event.to_string(),
            });
        }

        {
            let mut slot = self.slot.write().await;
            slot.token = None;
            slot.user = None;
        }
        self.advance(event)?;
        tracing::debug!("[SessionHandle] Session ended ({})", event);
        self.tokens.clear().await
    }

    fn advance(&self, event: SessionEvent) -> Result<SessionState> {
        let mut outcome = Ok(SessionState::Anonymous);
        self.state_tx.send_if_modified(|state| match state.next(event) {
            Ok(next) => {
                let changed = *state != next;
                *state = next;
                outcome = Ok(next);
                changed
            }
            Err(e) => {
                outcome = Err(e);
                false
            }
        });
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::token::MemoryTokenStore;

    fn admin() -> User {
        User {
            id: 1,
            email: "a@b.com".to_string(),
            name: "Ada".to_string(),
            role: Role::Admin,
            organisation: Some(OrganisationRef {
                id: 7,
                name: "Federal".to_string(),
            }),
            profile_picture: None,
        }
    }

    #[tokio::test]
    async fn test_establish_persists_token() {
        let store = Arc::new(MemoryTokenStore::new());
        let handle = SessionHandle::new(store.clone());

        handle.begin_authentication().unwrap();
        handle.establish("T".to_string(), admin()).await.unwrap();

        assert!(handle.is_authenticated().await);
        assert_eq!(handle.state(), SessionState::Authenticated);
        assert_eq!(store.peek().as_deref(), Some("T"));

        let session = handle.snapshot().await.unwrap();
        assert_eq!(session.user_id, 1);
        assert_eq!(session.role, Role::Admin);
        assert_eq!(session.organisation.unwrap().id, 7);
    }

    #[tokio::test]
    async fn test_end_clears_memory_and_storage() {
        let store = Arc::new(MemoryTokenStore::new());
        let handle = SessionHandle::new(store.clone());
        handle.begin_authentication().unwrap();
        handle.establish("T".to_string(), admin()).await.unwrap();

        handle.end(SessionEvent::Unauthorized).await.unwrap();

        assert!(!handle.is_authenticated().await);
        assert!(handle.token().await.is_none());
        assert!(handle.user().await.is_none());
        assert_eq!(handle.state(), SessionState::Anonymous);
        assert!(store.peek().is_none());
    }

    #[tokio::test]
    async fn test_end_rejects_non_terminal_event() {
        let handle = SessionHandle::new(Arc::new(MemoryTokenStore::new()));
        assert!(handle.end(SessionEvent::Established).await.is_err());
    }

    #[tokio::test]
    async fn test_rehydrate_keeps_token_but_stays_anonymous() {
        let store = Arc::new(MemoryTokenStore::with_token("persisted"));
        let handle = SessionHandle::rehydrate(store).await.unwrap();

        assert_eq!(handle.token().await.as_deref(), Some("persisted"));
        assert!(!handle.is_authenticated().await);
        assert_eq!(handle.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_subscribers_see_forced_logout() {
        let handle = SessionHandle::new(Arc::new(MemoryTokenStore::new()));
        let mut rx = handle.subscribe();
        handle.begin_authentication().unwrap();
        handle.establish("T".to_string(), admin()).await.unwrap();
        let _ = rx.borrow_and_update();

        handle.end(SessionEvent::Unauthorized).await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_replace_token_requires_refresh() {
        let handle = SessionHandle::new(Arc::new(MemoryTokenStore::new()));
        handle.begin_authentication().unwrap();
        handle.establish("T".to_string(), admin()).await.unwrap();

        assert!(handle.replace_token("U".to_string()).await.is_err());

        handle.begin_refresh().unwrap();
        handle.replace_token("U".to_string()).await.unwrap();
        assert_eq!(handle.token().await.as_deref(), Some("U"));
        assert_eq!(handle.state(), SessionState::Authenticated);
    }
}
