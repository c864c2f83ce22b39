use crate::loading::LoadingFlag;
use rcap_core::dashboard::DashboardSummary;
use rcap_core::envelope::Envelope;
use rcap_core::error::{RcapError, Result};
use rcap_core::session::Session;
use rcap_core::user::Role;
use rcap_interaction::ApiClient;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Role-specific dashboard figures.
pub struct DashboardStore {
    client: Arc<ApiClient>,
    summary: RwLock<Option<DashboardSummary>>,
    loading: LoadingFlag,
}

impl DashboardStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            summary: RwLock::new(None),
            loading: LoadingFlag::new(),
        }
    }

    pub fn loading(&self) -> bool {
        self.loading.get()
    }

    pub async fn summary(&self) -> Option<DashboardSummary> {
        self.summary.read().await.clone()
    }

    /// Loads `/dashboard/{role}`, e.g. `/dashboard/sub_admin`.
    pub async fn fetch_dashboard(&self, role: Role) -> Result<DashboardSummary> {
        self.load(&format!("/dashboard/{}", role)).await
    }

    pub async fn fetch_summary(&self) -> Result<DashboardSummary> {
        self.load("/dashboard/summary").await
    }

    /// Loads the dashboard matching the role of the given session.
    pub async fn fetch_for_session(&self, session: Option<&Session>) -> Result<DashboardSummary> {
        let session = session.ok_or(RcapError::NotAuthenticated)?;
        self.fetch_dashboard(session.role).await
    }

    async fn load(&self, path: &str) -> Result<DashboardSummary> {
        let _loading = self.loading.begin();
        let summary = self
            .client
            .get::<Envelope<DashboardSummary>>(path)
            .await?
            .into_inner();

        *self.summary.write().await = Some(summary.clone());
        Ok(summary)
    }
}
