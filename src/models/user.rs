use garde::Validate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::claims::Role;

/// Represents a console user as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The unique identifier for the user.
    pub id: u64,
    /// The user's email address.
    pub email: String,
    /// Only present on requests; the server does not echo it back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// The user's role.
    pub role: Role,
}

/// The payload for registering a user.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewUser {
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 1))]
    pub password: String,
    #[garde(skip)]
    pub role: Role,
}

impl Default for NewUser {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            role: Role::User,
        }
    }
}

/// The payload for logging in.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 1))]
    pub password: String,
}

/// The login endpoint's response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// The raw credential.
    pub token: String,
    /// Whatever else the server sends alongside the token.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}
