pub mod activities;
pub mod analytics;
pub mod auth;
pub mod dashboard;
pub mod help;
pub mod messages;
pub mod notifications;
pub mod onboarding;
pub mod organisations;
pub mod profile;
pub mod route;
pub mod templates;
pub mod utils;
