//! Inbox and compose.

use crate::loading::LoadingFlag;
use chrono::Utc;
use rcap_core::envelope::{Envelope, Page};
use rcap_core::error::Result;
use rcap_core::message::{Message, MessageFilters, NewMessage, Reply};
use rcap_interaction::{ApiClient, ApiRequest};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct MessageState {
    messages: Vec<Message>,
    current: Option<Message>,
}

pub struct MessageStore {
    client: Arc<ApiClient>,
    state: RwLock<MessageState>,
    loading: LoadingFlag,
}

impl MessageStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            state: RwLock::new(MessageState::default()),
            loading: LoadingFlag::new(),
        }
    }

    pub fn loading(&self) -> bool {
        self.loading.get()
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.state.read().await.messages.clone()
    }

    pub async fn current_message(&self) -> Option<Message> {
        self.state.read().await.current.clone()
    }

    pub async fn fetch_messages(&self, filters: &MessageFilters) -> Result<Page<Message>> {
        let _loading = self.loading.begin();
        let page: Page<Message> = self.client.get_with("/messages", filters).await?;

        self.state.write().await.messages = page.items.clone();
        Ok(page)
    }

    pub async fn fetch_message(&self, id: u64) -> Result<Message> {
        let _loading = self.loading.begin();
        let message = self
            .client
            .get::<Envelope<Message>>(&format!("/messages/{}", id))
            .await?
            .into_inner();

        self.state.write().await.current = Some(message.clone());
        Ok(message)
    }

    /// Sends a message and puts it at the top of the list.
    pub async fn send_message(&self, data: &NewMessage) -> Result<Message> {
        let _loading = self.loading.begin();
        let message = self
            .client
            .post::<Envelope<Message>, _>("/messages", data)
            .await?
            .into_inner();

        self.state.write().await.messages.insert(0, message.clone());
        Ok(message)
    }

    /// Marks a message read and stamps the signed-in user's recipient entry.
    pub async fn mark_as_read(&self, id: u64) -> Result<()> {
        self.client
            .call(ApiRequest::put(format!("/messages/{}/read", id)))
            .await?;

        let Some(user) = self.client.session().user().await else {
            return Ok(());
        };
        let now = Utc::now();
        let mut state = self.state.write().await;
        if let Some(message) = state.messages.iter_mut().find(|m| m.id == id) {
            message.mark_read_by(user.id, now);
        }
        if let Some(current) = state.current.as_mut().filter(|m| m.id == id) {
            current.mark_read_by(user.id, now);
        }
        Ok(())
    }

    pub async fn reply_to_message(&self, id: u64, body: &str) -> Result<Message> {
        let _loading = self.loading.begin();
        let reply = self
            .client
            .post::<Envelope<Message>, _>(
                &format!("/messages/{}/reply", id),
                &Reply {
                    body: body.to_string(),
                },
            )
            .await?
            .into_inner();
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Harness, user_with_role};
    use rcap_core::user::Role;
    use rcap_interaction::Method;
    use serde_json::{Value, json};

    fn message(id: u64) -> Value {
        json!({
            "id": id,
            "subject": format!("Subject {}", id),
            "body": "Body",
            "is_urgent": false,
            "sender": { "id": 2, "name": "Admin" },
            "recipients": [
                { "user_id": 1, "user_name": "User 1", "read_at": null },
                { "user_id": 3, "user_name": "User 3", "read_at": null }
            ],
            "created_at": "2024-03-02T08:30:00Z"
        })
    }

    #[tokio::test]
    async fn test_mark_as_read_stamps_own_recipient() {
        let h = Harness::signed_in(user_with_role(1, Role::User)).await;
        h.transport
            .respond(Method::Get, "/messages", 200, json!({ "data": [message(4)] }))
            .respond_empty(Method::Put, "/messages/4/read", 204);
        let store = MessageStore::new(h.client.clone());
        store.fetch_messages(&MessageFilters::default()).await.unwrap();

        store.mark_as_read(4).await.unwrap();

        let message = &store.messages().await[0];
        assert!(message.recipients[0].read_at.is_some());
        assert!(message.recipients[1].read_at.is_none());
    }

    #[tokio::test]
    async fn test_send_prepends_and_reply_is_returned() {
        let h = Harness::signed_in(user_with_role(1, Role::Admin)).await;
        h.transport
            .respond(Method::Get, "/messages", 200, json!([message(1)]))
            .respond(Method::Post, "/messages", 201, message(2))
            .respond(Method::Post, "/messages/2/reply", 201, json!({ "data": message(3) }));
        let store = MessageStore::new(h.client.clone());
        store
            .fetch_messages(&MessageFilters {
                page: None,
                unread_only: Some(true),
            })
            .await
            .unwrap();

        store
            .send_message(&NewMessage {
                organisation_id: Some(10),
                subject: "Subject 2".to_string(),
                body: "Body".to_string(),
                is_urgent: Some(true),
                ..NewMessage::default()
            })
            .await
            .unwrap();
        let reply = store.reply_to_message(2, "Thanks").await.unwrap();

        let ids: Vec<u64> = store.messages().await.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(reply.id, 3);
        let sent = &h.transport.requests_to(Method::Post, "/messages/2/reply")[0];
        assert_eq!(sent.json_body().unwrap(), &json!({ "body": "Thanks" }));
        let listed = &h.transport.requests_to(Method::Get, "/messages")[0];
        assert_eq!(listed.query_value("unread_only"), Some("true"));
    }
}
