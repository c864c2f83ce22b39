//! In-app notifications.

pub mod model;

pub use model::{Notification, NotificationFilters, NotificationKind, NotificationPreferences};
