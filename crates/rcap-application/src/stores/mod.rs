//! REST-backed domain stores.
//!
//! Each store owns one slice of client state behind a `tokio::sync::RwLock`.
//! Fetches replace the cached state wholesale; the last response to resolve
//! wins.

pub mod activity_store;
pub mod analytics_store;
pub mod dashboard_store;
pub mod help_store;
pub mod message_store;
pub mod onboarding_store;
pub mod organisation_store;
pub mod template_store;
pub mod user_store;

pub use activity_store::ActivityStore;
pub use analytics_store::AnalyticsStore;
pub use dashboard_store::DashboardStore;
pub use help_store::HelpStore;
pub use message_store::MessageStore;
pub use onboarding_store::OnboardingStore;
pub use organisation_store::OrganisationStore;
pub use template_store::TemplateStore;
pub use user_store::UserStore;
