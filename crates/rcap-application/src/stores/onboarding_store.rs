//! First-run walkthrough steps and progress.

use crate::loading::LoadingFlag;
use rcap_core::envelope::Envelope;
use rcap_core::error::Result;
use rcap_core::onboarding::{OnboardingProgress, OnboardingStep, StepCompletion};
use rcap_interaction::{ApiClient, ApiRequest};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct OnboardingState {
    steps: Vec<OnboardingStep>,
    progress: Option<OnboardingProgress>,
}

pub struct OnboardingStore {
    client: Arc<ApiClient>,
    state: RwLock<OnboardingState>,
    loading: LoadingFlag,
}

impl OnboardingStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            state: RwLock::new(OnboardingState::default()),
            loading: LoadingFlag::new(),
        }
    }

    pub fn loading(&self) -> bool {
        self.loading.get()
    }

    pub async fn steps(&self) -> Vec<OnboardingStep> {
        self.state.read().await.steps.clone()
    }

    pub async fn progress(&self) -> Option<OnboardingProgress> {
        self.state.read().await.progress.clone()
    }

    pub async fn fetch_steps(&self) -> Result<Vec<OnboardingStep>> {
        let _loading = self.loading.begin();
        let steps = self
            .client
            .get::<Envelope<Vec<OnboardingStep>>>("/onboarding/steps")
            .await?
            .into_inner();

        self.state.write().await.steps = steps.clone();
        Ok(steps)
    }

    pub async fn fetch_progress(&self) -> Result<OnboardingProgress> {
        let _loading = self.loading.begin();
        self.load_progress().await
    }

    async fn load_progress(&self) -> Result<OnboardingProgress> {
        let progress = self
            .client
            .get::<Envelope<OnboardingProgress>>("/onboarding/progress")
            .await?
            .into_inner();

        self.state.write().await.progress = Some(progress.clone());
        Ok(progress)
    }

    /// Records a step as completed or skipped; cached progress is recomputed
    /// locally.
    pub async fn complete_step(&self, step_id: u64, skipped: bool) -> Result<()> {
        let request = ApiRequest::put(format!("/onboarding/steps/{}/complete", step_id))
            .with_json(&StepCompletion { skipped })?;
        self.client.call(request).await?;

        if let Some(progress) = self.state.write().await.progress.as_mut() {
            progress.record(step_id, skipped);
        }
        Ok(())
    }

    /// Resets progress on the server, then reloads it.
    pub async fn reset_progress(&self) -> Result<OnboardingProgress> {
        let _loading = self.loading.begin();
        self.client
            .call(ApiRequest::post("/onboarding/reset"))
            .await?;

        self.state.write().await.progress = None;
        self.load_progress().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Harness, user_with_role};
    use rcap_core::user::Role;
    use rcap_interaction::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_complete_step_recomputes_percentage() {
        let h = Harness::signed_in(user_with_role(1, Role::User)).await;
        h.transport
            .respond(
                Method::Get,
                "/onboarding/progress",
                200,
                json!({ "data": { "completed_steps": [1], "skipped_steps": [], "total_steps": 4, "progress_percentage": 25.0 } }),
            )
            .respond_empty(Method::Put, "/onboarding/steps/2/complete", 204)
            .respond_empty(Method::Put, "/onboarding/steps/3/complete", 204);
        let store = OnboardingStore::new(h.client.clone());
        store.fetch_progress().await.unwrap();

        store.complete_step(2, false).await.unwrap();
        store.complete_step(3, true).await.unwrap();

        let progress = store.progress().await.unwrap();
        assert_eq!(progress.completed_steps, vec![1, 2]);
        assert_eq!(progress.skipped_steps, vec![3]);
        assert_eq!(progress.progress_percentage, 50.0);
        let sent = &h.transport.requests_to(Method::Put, "/onboarding/steps/3/complete")[0];
        assert_eq!(sent.json_body().unwrap(), &json!({ "skipped": true }));
    }

    #[tokio::test]
    async fn test_complete_without_cached_progress() {
        let h = Harness::signed_in(user_with_role(1, Role::User)).await;
        h.transport
            .respond_empty(Method::Put, "/onboarding/steps/1/complete", 204);
        let store = OnboardingStore::new(h.client.clone());

        store.complete_step(1, false).await.unwrap();

        assert!(store.progress().await.is_none());
    }

    #[tokio::test]
    async fn test_reset_refetches_progress() {
        let h = Harness::signed_in(user_with_role(1, Role::User)).await;
        h.transport
            .respond(
                Method::Get,
                "/onboarding/progress",
                200,
                json!({ "completed_steps": [1, 2], "total_steps": 4, "progress_percentage": 50.0 }),
            )
            .respond(
                Method::Get,
                "/onboarding/progress",
                200,
                json!({ "completed_steps": [], "total_steps": 4, "progress_percentage": 0.0 }),
            )
            .respond_empty(Method::Post, "/onboarding/reset", 204);
        let store = OnboardingStore::new(h.client.clone());
        store.fetch_progress().await.unwrap();

        let progress = store.reset_progress().await.unwrap();

        assert!(progress.completed_steps.is_empty());
        assert_eq!(store.progress().await.unwrap().progress_percentage, 0.0);
        assert!(!store.loading());
    }

    #[tokio::test]
    async fn test_steps() {
        let h = Harness::signed_in(user_with_role(1, Role::User)).await;
        h.transport.respond(
            Method::Get,
            "/onboarding/steps",
            200,
            json!([{ "id": 1, "title": "Welcome", "order": 1, "role": "user", "is_active": true }]),
        );
        let store = OnboardingStore::new(h.client.clone());

        assert_eq!(store.fetch_steps().await.unwrap()[0].title, "Welcome");
    }

    #[tokio::test]
    async fn test_progress_without_total_is_decode_error() {
        let h = Harness::signed_in(user_with_role(1, Role::User)).await;
        h.transport.respond(
            Method::Get,
            "/onboarding/progress",
            200,
            json!({ "status": "maintenance" }),
        );
        let store = OnboardingStore::new(h.client.clone());

        let err = store.fetch_progress().await.unwrap_err();

        assert!(err.is_decode());
        assert!(store.progress().await.is_none());
        assert!(!store.loading());
    }
}
