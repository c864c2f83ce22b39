//! Internal messaging between platform users.

use crate::user::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub user_id: u64,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub read_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub is_urgent: bool,
    pub sender: Sender,
    #[serde(default)]
    pub recipients: Vec<Recipient>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Stamps `read_at` on the recipient entry of `user_id`, if present and unread.
    pub fn mark_read_by(&mut self, user_id: u64, at: DateTime<Utc>) -> bool {
        match self
            .recipients
            .iter_mut()
            .find(|recipient| recipient.user_id == user_id)
        {
            Some(recipient) if recipient.read_at.is_none() => {
                recipient.read_at = Some(at);
                true
            }
            _ => false,
        }
    }
}

/// A new message. Address it to one user, a whole organisation, or every
/// user holding a role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub subject: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_urgent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub body: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MessageFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread_only: Option<bool>,
}
