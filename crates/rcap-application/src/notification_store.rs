//! In-app notifications and their preferences.

use crate::loading::LoadingFlag;
use chrono::Utc;
use rcap_core::envelope::{Count, Envelope};
use rcap_core::error::Result;
use rcap_core::notification::{Notification, NotificationFilters, NotificationPreferences};
use rcap_interaction::{ApiClient, ApiRequest};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct NotificationState {
    notifications: Vec<Notification>,
    unread_count: u64,
    preferences: Option<NotificationPreferences>,
}

pub struct NotificationStore {
    client: Arc<ApiClient>,
    state: RwLock<NotificationState>,
    loading: LoadingFlag,
}

impl NotificationStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            state: RwLock::new(NotificationState::default()),
            loading: LoadingFlag::new(),
        }
    }

    pub fn loading(&self) -> bool {
        self.loading.get()
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.state.read().await.notifications.clone()
    }

    pub async fn unread_count(&self) -> u64 {
        self.state.read().await.unread_count
    }

    pub async fn preferences(&self) -> Option<NotificationPreferences> {
        self.state.read().await.preferences
    }

    pub async fn unread_notifications(&self) -> Vec<Notification> {
        self.state
            .read()
            .await
            .notifications
            .iter()
            .filter(|n| n.is_unread())
            .cloned()
            .collect()
    }

    /// Urgent notifications that have not been read yet.
    pub async fn urgent_notifications(&self) -> Vec<Notification> {
        self.state
            .read()
            .await
            .notifications
            .iter()
            .filter(|n| n.is_urgent() && n.is_unread())
            .cloned()
            .collect()
    }

    pub async fn fetch_notifications(&self, filters: &NotificationFilters) -> Result<Vec<Notification>> {
        let _loading = self.loading.begin();
        let notifications = self
            .client
            .get_with::<Envelope<Vec<Notification>>, _>("/notifications", filters)
            .await?
            .into_inner();

        self.state.write().await.notifications = notifications.clone();
        Ok(notifications)
    }

    /// Refreshes the unread badge count.
    ///
    /// Never fails: any error yields 0 and keeps the previous count.
    pub async fn fetch_unread_count(&self) -> u64 {
        match self
            .client
            .get::<Envelope<Count>>("/notifications/unread-count")
            .await
        {
            Ok(count) => {
                let count = count.into_inner().count;
                self.state.write().await.unread_count = count;
                count
            }
            Err(e) => {
                tracing::debug!("[NotificationStore] Unread count unavailable: {}", e);
                0
            }
        }
    }

    pub async fn mark_as_read(&self, id: u64) -> Result<()> {
        self.client
            .call(ApiRequest::put(format!("/notifications/{}/read", id)))
            .await?;

        let mut state = self.state.write().await;
        if let Some(notification) = state.notifications.iter_mut().find(|n| n.id == id) {
            notification.read_at = Some(Utc::now());
            state.unread_count = state.unread_count.saturating_sub(1);
        }
        Ok(())
    }

    pub async fn mark_all_as_read(&self) -> Result<()> {
        self.client
            .call(ApiRequest::put("/notifications/read-all"))
            .await?;

        let now = Utc::now();
        let mut state = self.state.write().await;
        for notification in state.notifications.iter_mut() {
            notification.read_at.get_or_insert(now);
        }
        state.unread_count = 0;
        Ok(())
    }

    pub async fn fetch_preferences(&self) -> Result<NotificationPreferences> {
        let _loading = self.loading.begin();
        let preferences = self
            .client
            .get::<Envelope<NotificationPreferences>>("/notifications/preferences")
            .await?
            .into_inner();

        self.state.write().await.preferences = Some(preferences);
        Ok(preferences)
    }

    pub async fn update_preferences(
        &self,
        preferences: &NotificationPreferences,
    ) -> Result<NotificationPreferences> {
        let _loading = self.loading.begin();
        let preferences = self
            .client
            .put::<Envelope<NotificationPreferences>, _>("/notifications/preferences", preferences)
            .await?
            .into_inner();

        self.state.write().await.preferences = Some(preferences);
        Ok(preferences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Harness, user_with_role};
    use rcap_core::notification::NotificationKind;
    use rcap_core::user::Role;
    use rcap_interaction::Method;
    use serde_json::{Value, json};
    use std::time::Duration;

    fn notification(id: u64, kind: &str, read_at: Option<&str>) -> Value {
        json!({
            "id": id,
            "type": kind,
            "title": format!("Notification {}", id),
            "body": "",
            "read_at": read_at,
            "created_at": "2024-03-01T09:00:00Z"
        })
    }

    async fn store_with_list() -> (Harness, NotificationStore) {
        let h = Harness::signed_in(user_with_role(1, Role::User)).await;
        h.transport.respond(
            Method::Get,
            "/notifications",
            200,
            json!({ "data": [
                notification(1, "message", None),
                notification(2, "urgent", None),
                notification(3, "system", Some("2024-02-01T10:00:00Z")),
            ]}),
        );
        let store = NotificationStore::new(h.client.clone());
        store
            .fetch_notifications(&NotificationFilters::default())
            .await
            .unwrap();
        (h, store)
    }

    #[tokio::test]
    async fn test_derived_views() {
        let (_h, store) = store_with_list().await;

        assert_eq!(store.notifications().await.len(), 3);
        assert_eq!(store.unread_notifications().await.len(), 2);
        let urgent = store.urgent_notifications().await;
        assert_eq!(urgent.len(), 1);
        assert_eq!(urgent[0].kind, NotificationKind::Urgent);
    }

    #[tokio::test]
    async fn test_filters_reach_the_server() {
        let h = Harness::signed_in(user_with_role(1, Role::User)).await;
        h.transport.respond(Method::Get, "/notifications", 200, json!([]));
        let store = NotificationStore::new(h.client.clone());

        store
            .fetch_notifications(&NotificationFilters::latest(5))
            .await
            .unwrap();

        let sent = &h.transport.requests_to(Method::Get, "/notifications")[0];
        assert_eq!(sent.query_value("limit"), Some("5"));
        assert_eq!(sent.query_value("unread_only"), None);
    }

    #[tokio::test]
    async fn test_unread_count_in_both_shapes() {
        let h = Harness::signed_in(user_with_role(1, Role::User)).await;
        h.transport
            .respond(
                Method::Get,
                "/notifications/unread-count",
                200,
                json!({ "data": { "count": 4 } }),
            )
            .respond(
                Method::Get,
                "/notifications/unread-count",
                200,
                json!({ "count": 2 }),
            );
        let store = NotificationStore::new(h.client.clone());

        assert_eq!(store.fetch_unread_count().await, 4);
        assert_eq!(store.fetch_unread_count().await, 2);
        assert_eq!(store.unread_count().await, 2);
    }

    #[tokio::test]
    async fn test_unread_count_failure_keeps_previous() {
        let h = Harness::signed_in(user_with_role(1, Role::User)).await;
        h.transport
            .respond(
                Method::Get,
                "/notifications/unread-count",
                200,
                json!({ "count": 7 }),
            )
            .respond(Method::Get, "/notifications/unread-count", 500, json!({}));
        let store = NotificationStore::new(h.client.clone());

        assert_eq!(store.fetch_unread_count().await, 7);
        assert_eq!(store.fetch_unread_count().await, 0);
        assert_eq!(store.unread_count().await, 7);
    }

    #[tokio::test]
    async fn test_mark_as_read_decrements_floored() {
        let (h, store) = store_with_list().await;
        h.transport
            .respond_empty(Method::Put, "/notifications/1/read", 204)
            .respond_empty(Method::Put, "/notifications/99/read", 204);

        store.mark_as_read(1).await.unwrap();
        assert_eq!(store.unread_count().await, 0);
        assert!(store.notifications().await[0].read_at.is_some());

        // not cached: count untouched
        store.mark_as_read(99).await.unwrap();
        assert_eq!(store.unread_count().await, 0);
    }

    #[tokio::test]
    async fn test_mark_all_as_read() {
        let (h, store) = store_with_list().await;
        h.transport
            .respond(
                Method::Get,
                "/notifications/unread-count",
                200,
                json!({ "count": 2 }),
            )
            .respond_empty(Method::Put, "/notifications/read-all", 204);
        store.fetch_unread_count().await;
        let previously_read = store.notifications().await[2].read_at;

        store.mark_all_as_read().await.unwrap();

        let notifications = store.notifications().await;
        assert!(notifications.iter().all(|n| n.read_at.is_some()));
        assert_eq!(notifications[2].read_at, previously_read);
        assert_eq!(store.unread_count().await, 0);
        assert!(store.unread_notifications().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_mark_all_leaves_state() {
        let (h, store) = store_with_list().await;
        h.transport
            .respond(Method::Put, "/notifications/read-all", 500, json!({}));

        assert!(store.mark_all_as_read().await.is_err());
        assert_eq!(store.unread_notifications().await.len(), 2);
    }

    #[tokio::test]
    async fn test_preferences_round_trip() {
        let h = Harness::signed_in(user_with_role(1, Role::User)).await;
        let prefs = json!({
            "email_enabled": true,
            "in_app_enabled": true,
            "message_email": false,
            "message_in_app": true,
            "activity_email": false,
            "activity_in_app": true,
            "urgent_email": true,
            "urgent_in_app": true
        });
        h.transport
            .respond(Method::Get, "/notifications/preferences", 200, json!({ "data": prefs }))
            .respond(Method::Put, "/notifications/preferences", 200, prefs.clone());
        let store = NotificationStore::new(h.client.clone());

        let mut loaded = store.fetch_preferences().await.unwrap();
        assert!(loaded.urgent_email);
        loaded.message_email = true;
        store.update_preferences(&loaded).await.unwrap();

        let sent = &h.transport.requests_to(Method::Put, "/notifications/preferences")[0];
        assert_eq!(sent.json_body().unwrap()["message_email"], true);
        assert!(store.preferences().await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_spans_the_request() {
        let h = Harness::signed_in(user_with_role(1, Role::User)).await;
        h.transport.respond_delayed(
            Method::Get,
            "/notifications",
            500,
            json!({}),
            Duration::from_millis(100),
        );
        let store = Arc::new(NotificationStore::new(h.client.clone()));

        let task = {
            let store = store.clone();
            tokio::spawn(async move { store.fetch_notifications(&NotificationFilters::default()).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(store.loading());

        assert!(task.await.unwrap().is_err());
        assert!(!store.loading());
    }
}
