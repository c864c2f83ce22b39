use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationKind {
    Message,
    Activity,
    System,
    Urgent,
}

/// A server-generated notification.
///
/// The client never deletes notifications; acknowledging one only sets
/// `read_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_unread(&self) -> bool {
        self.read_at.is_none()
    }

    pub fn is_urgent(&self) -> bool {
        self.kind == NotificationKind::Urgent
    }
}

/// Delivery channels per notification category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub email_enabled: bool,
    pub in_app_enabled: bool,
    pub message_email: bool,
    pub message_in_app: bool,
    pub activity_email: bool,
    pub activity_in_app: bool,
    pub urgent_email: bool,
    pub urgent_in_app: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NotificationFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread_only: Option<bool>,
}

impl NotificationFilters {
    /// The most recent `limit` notifications.
    pub fn latest(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            unread_only: None,
        }
    }
}
