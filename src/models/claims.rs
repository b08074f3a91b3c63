use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A console role.
///
/// Closed set: anything other than `ADMIN` or `USER` on the wire fails to
/// deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// All roles, most privileged first.
    pub const ALL: [Role; 2] = [Role::Admin, Role::User];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            other => Err(format!("unknown role '{}' (expected ADMIN or USER)", other)),
        }
    }
}

/// Claims decoded from a credential.
///
/// Never persisted on its own; always re-derived from the raw credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// The user's numeric identifier (always positive).
    pub identity: u64,
    /// The user's email address.
    pub email: String,
    /// The user's role.
    pub role: Role,
    /// When the credential was issued.
    pub issued_at: DateTime<Utc>,
    /// When the credential expires.
    pub expires_at: DateTime<Utc>,
}

impl Claims {
    /// Whether `expires_at` has passed at `now`.
    ///
    /// Informational only: the session never rejects a credential on this
    /// basis; the server answers 403 when it stops accepting it.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
