//! Session domain model and auth endpoint payloads.

use crate::user::{OrganisationRef, Role, User};
use serde::{Deserialize, Serialize};

/// Snapshot of an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: u64,
    pub role: Role,
    pub organisation: Option<OrganisationRef>,
    pub bearer_token: String,
}

impl Session {
    pub fn new(user: &User, bearer_token: impl Into<String>) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
            organisation: user.organisation.clone(),
            bearer_token: bearer_token.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationData {
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation_id: Option<u64>,
}

/// Body returned by `/auth/login` and `/auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

/// Body returned by `/auth/refresh`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub token: String,
}
