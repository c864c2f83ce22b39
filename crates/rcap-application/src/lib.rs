//! Application layer for the RCAP client.
//!
//! Stores coordinate the API client with the session and keep the client-side
//! state each screen or command reads. [`AppContext`] wires them together.

pub mod auth_store;
pub mod context;
pub mod loading;
pub mod notification_poller;
pub mod notification_store;
pub mod stores;

#[cfg(test)]
mod test_support;

pub use auth_store::AuthStore;
pub use context::AppContext;
pub use loading::LoadingFlag;
pub use notification_poller::NotificationPoller;
pub use notification_store::NotificationStore;
pub use stores::{
    ActivityStore, AnalyticsStore, DashboardStore, HelpStore, MessageStore, OnboardingStore,
    OrganisationStore, TemplateStore, UserStore,
};
