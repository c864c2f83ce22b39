pub mod activity;
pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod envelope;
pub mod error;
pub mod feedback;
pub mod guard;
pub mod help;
pub mod message;
pub mod notification;
pub mod onboarding;
pub mod organisation;
pub mod route;
pub mod session;
pub mod template;
pub mod user;

// Re-export common error type
pub use error::{RcapError, Result};
