//! User identity and profile.

pub mod model;

pub use model::{OrganisationRef, PasswordChange, ProfileUpdate, Role, User};
