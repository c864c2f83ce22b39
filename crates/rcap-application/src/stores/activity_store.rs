//! Activity reports.

use crate::loading::LoadingFlag;
use rcap_core::activity::{Activity, ActivityFilters, ActivityPatch, NewActivity};
use rcap_core::envelope::{Envelope, Page};
use rcap_core::error::Result;
use rcap_interaction::ApiClient;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct ActivityState {
    activities: Vec<Activity>,
    current: Option<Activity>,
}

pub struct ActivityStore {
    client: Arc<ApiClient>,
    state: RwLock<ActivityState>,
    loading: LoadingFlag,
}

impl ActivityStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            state: RwLock::new(ActivityState::default()),
            loading: LoadingFlag::new(),
        }
    }

    pub fn loading(&self) -> bool {
        self.loading.get()
    }

    pub async fn activities(&self) -> Vec<Activity> {
        self.state.read().await.activities.clone()
    }

    pub async fn current_activity(&self) -> Option<Activity> {
        self.state.read().await.current.clone()
    }

    /// Loads a page of activities; the returned page keeps the pagination meta.
    pub async fn fetch_activities(&self, filters: &ActivityFilters) -> Result<Page<Activity>> {
        let _loading = self.loading.begin();
        let page: Page<Activity> = self.client.get_with("/activities", filters).await?;

        self.state.write().await.activities = page.items.clone();
        Ok(page)
    }

    pub async fn fetch_activity(&self, id: u64) -> Result<Activity> {
        let _loading = self.loading.begin();
        let activity = self
            .client
            .get::<Envelope<Activity>>(&format!("/activities/{}", id))
            .await?
            .into_inner();

        self.state.write().await.current = Some(activity.clone());
        Ok(activity)
    }

    /// Creates an activity and puts it at the top of the list.
    pub async fn create_activity(&self, data: &NewActivity) -> Result<Activity> {
        let _loading = self.loading.begin();
        let activity = self
            .client
            .post::<Envelope<Activity>, _>("/activities", data)
            .await?
            .into_inner();

        self.state.write().await.activities.insert(0, activity.clone());
        Ok(activity)
    }

    pub async fn update_activity(&self, id: u64, patch: &ActivityPatch) -> Result<Activity> {
        let _loading = self.loading.begin();
        let activity = self
            .client
            .put::<Envelope<Activity>, _>(&format!("/activities/{}", id), patch)
            .await?
            .into_inner();

        let mut state = self.state.write().await;
        replace_by_id(&mut state.activities, id, &activity);
        if state.current.as_ref().is_some_and(|current| current.id == id) {
            state.current = Some(activity.clone());
        }
        Ok(activity)
    }

    /// Submits a draft for review.
    pub async fn submit_activity(&self, id: u64) -> Result<Activity> {
        let _loading = self.loading.begin();
        let activity = self
            .client
            .post_empty::<Envelope<Activity>>(&format!("/activities/{}/submit", id))
            .await?
            .into_inner();

        replace_by_id(&mut self.state.write().await.activities, id, &activity);
        Ok(activity)
    }

    pub async fn delete_activity(&self, id: u64) -> Result<()> {
        let _loading = self.loading.begin();
        self.client.delete(&format!("/activities/{}", id)).await?;

        self.state
            .write()
            .await
            .activities
            .retain(|activity| activity.id != id);
        Ok(())
    }
}

fn replace_by_id(activities: &mut [Activity], id: u64, updated: &Activity) {
    if let Some(slot) = activities.iter_mut().find(|activity| activity.id == id) {
        *slot = updated.clone();
    }
}
