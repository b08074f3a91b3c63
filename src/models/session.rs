use serde::Serialize;

use crate::models::claims::{Claims, Role};

/// The authorization state the console renders from.
///
/// Derived entirely from the decoded claims; `Session::default()` is the
/// anonymous state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Whether a decoded credential is held.
    pub is_authenticated: bool,
    /// The signed-in user's role.
    pub role: Option<Role>,
    /// The signed-in user's email address.
    pub email: Option<String>,
}

impl Session {
    /// The anonymous session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Builds the authenticated session for a set of claims.
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            is_authenticated: true,
            role: Some(claims.role),
            email: Some(claims.email.clone()),
        }
    }
}
