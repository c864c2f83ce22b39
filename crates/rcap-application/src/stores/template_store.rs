use crate::loading::LoadingFlag;
use rcap_core::envelope::Envelope;
use rcap_core::error::Result;
use rcap_core::template::ReportTemplate;
use rcap_interaction::ApiClient;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct TemplateState {
    templates: Vec<ReportTemplate>,
    current: Option<ReportTemplate>,
}

/// Report templates used when filing activities.
pub struct TemplateStore {
    client: Arc<ApiClient>,
    state: RwLock<TemplateState>,
    loading: LoadingFlag,
}

impl TemplateStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            state: RwLock::new(TemplateState::default()),
            loading: LoadingFlag::new(),
        }
    }

    pub fn loading(&self) -> bool {
        self.loading.get()
    }

    pub async fn templates(&self) -> Vec<ReportTemplate> {
        self.state.read().await.templates.clone()
    }

    pub async fn current_template(&self) -> Option<ReportTemplate> {
        self.state.read().await.current.clone()
    }

    pub async fn fetch_templates(&self) -> Result<Vec<ReportTemplate>> {
        let _loading = self.loading.begin();
        let templates = self
            .client
            .get::<Envelope<Vec<ReportTemplate>>>("/templates")
            .await?
            .into_inner();

        self.state.write().await.templates = templates.clone();
        Ok(templates)
    }

    pub async fn fetch_template(&self, id: u64) -> Result<ReportTemplate> {
        let _loading = self.loading.begin();
        let template = self
            .client
            .get::<Envelope<ReportTemplate>>(&format!("/templates/{}", id))
            .await?
            .into_inner();

        self.state.write().await.current = Some(template.clone());
        Ok(template)
    }
}
