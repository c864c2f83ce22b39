//! Shared fixtures for store tests.

use rcap_core::feedback::{RecordingNavigator, RecordingNotifier};
use rcap_core::session::{MemoryTokenStore, SessionHandle};
use rcap_core::user::{OrganisationRef, Role, User};
use rcap_interaction::{ApiClient, ScriptedTransport};
use std::sync::Arc;

pub struct Harness {
    pub client: Arc<ApiClient>,
    pub transport: Arc<ScriptedTransport>,
    pub tokens: Arc<MemoryTokenStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
}

impl Harness {
    /// A client with an empty, anonymous session.
    pub fn anonymous() -> Self {
        Self::with_tokens(Arc::new(MemoryTokenStore::new()))
    }

    pub fn with_tokens(tokens: Arc<MemoryTokenStore>) -> Self {
        let transport = Arc::new(ScriptedTransport::new());
        let session = Arc::new(SessionHandle::new(tokens.clone()));
        Self::assemble(transport, session, tokens)
    }

    /// A client whose session was rehydrated from `tokens`.
    pub async fn rehydrated(tokens: Arc<MemoryTokenStore>) -> Self {
        let transport = Arc::new(ScriptedTransport::new());
        let session = Arc::new(SessionHandle::rehydrate(tokens.clone()).await.unwrap());
        Self::assemble(transport, session, tokens)
    }

    /// A client already signed in as `user` with token `T`.
    pub async fn signed_in(user: User) -> Self {
        let harness = Self::anonymous();
        let session = harness.client.session();
        session.begin_authentication().unwrap();
        session.establish("T".to_string(), user).await.unwrap();
        harness
    }

    fn assemble(
        transport: Arc<ScriptedTransport>,
        session: Arc<SessionHandle>,
        tokens: Arc<MemoryTokenStore>,
    ) -> Self {
        let notifier = Arc::new(RecordingNotifier::new());
        let navigator = Arc::new(RecordingNavigator::at("/"));
        let client = Arc::new(ApiClient::new(
            transport.clone(),
            session,
            notifier.clone(),
            navigator.clone(),
        ));
        Self {
            client,
            transport,
            tokens,
            notifier,
            navigator,
        }
    }
}

pub fn user_with_role(id: u64, role: Role) -> User {
    User {
        id,
        email: format!("user{}@rcap.test", id),
        name: format!("User {}", id),
        role,
        organisation: Some(OrganisationRef {
            id: 10,
            name: "Federal Office".to_string(),
        }),
        profile_picture: None,
    }
}
