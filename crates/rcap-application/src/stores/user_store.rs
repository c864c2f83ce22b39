//! The signed-in user's own profile.

use crate::loading::LoadingFlag;
use rcap_core::envelope::Envelope;
use rcap_core::error::{RcapError, Result};
use rcap_core::user::{PasswordChange, ProfileUpdate, User};
use rcap_interaction::{ApiClient, ApiRequest, FormPart};
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct UserStore {
    client: Arc<ApiClient>,
    current_user: RwLock<Option<User>>,
    loading: LoadingFlag,
}

impl UserStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            current_user: RwLock::new(None),
            loading: LoadingFlag::new(),
        }
    }

    pub fn loading(&self) -> bool {
        self.loading.get()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.current_user.read().await.clone()
    }

    pub async fn fetch_profile(&self) -> Result<User> {
        let _loading = self.loading.begin();
        let user = self
            .client
            .get::<Envelope<User>>("/users/me")
            .await?
            .into_inner();

        *self.current_user.write().await = Some(user.clone());
        Ok(user)
    }

    /// Updates name and/or profile picture as a multipart form.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        let _loading = self.loading.begin();
        let parts = profile_form(update).await?;
        let user = self
            .client
            .put_multipart::<Envelope<User>>("/users/me", parts)
            .await?
            .into_inner();

        *self.current_user.write().await = Some(user.clone());
        Ok(user)
    }

    pub async fn change_password(&self, data: &PasswordChange) -> Result<()> {
        let _loading = self.loading.begin();
        self.client
            .call(ApiRequest::put("/users/me/password").with_json(data)?)
            .await
    }
}

async fn profile_form(update: &ProfileUpdate) -> Result<Vec<FormPart>> {
    let mut parts = Vec::new();
    if let Some(name) = update.name.as_deref().filter(|name| !name.is_empty()) {
        parts.push(FormPart::text("name", name));
    }
    if let Some(path) = &update.profile_picture {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            RcapError::io(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "profile_picture".to_string());
        parts.push(FormPart::file("profile_picture", file_name, bytes));
    }
    Ok(parts)
}
