use std::fmt;

use crate::error::{AppError, Result};
use crate::models::claims::Role;
use crate::models::session::Session;
use crate::routes::Route;

/// The set of roles allowed through a gate.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleSet {
    admin: bool,
    user: bool,
}

impl RoleSet {
    /// Both roles. The default for every gate.
    pub const ALL: RoleSet = RoleSet { admin: true, user: true };
    /// Administrators only.
    pub const ADMIN_ONLY: RoleSet = RoleSet { admin: true, user: false };
    /// Nobody.
    pub const NONE: RoleSet = RoleSet { admin: false, user: false };

    /// Builds a set from a list of roles.
    pub fn of(roles: &[Role]) -> Self {
        roles.iter().fold(Self::NONE, |set, role| set.with(*role))
    }

    /// Returns a copy that also allows `role`.
    pub const fn with(self, role: Role) -> Self {
        match role {
            Role::Admin => RoleSet { admin: true, ..self },
            Role::User => RoleSet { user: true, ..self },
        }
    }

    pub const fn contains(self, role: Role) -> bool {
        match role {
            Role::Admin => self.admin,
            Role::User => self.user,
        }
    }
}

impl Default for RoleSet {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Debug for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(Role::ALL.iter().filter(|role| self.contains(**role)))
            .finish()
    }
}

/// Decides whether `current` may pass a gate requiring `required`.
///
/// Absent role (no session) never passes. ADMIN passes wherever USER does.
///
/// # Arguments
///
/// * `required` - The roles the gate admits.
/// * `current` - The signed-in role, if any.
///
/// # Returns
///
/// `true` if access is allowed.
pub fn can_access(required: RoleSet, current: Option<Role>) -> bool {
    match current {
        None => false,
        Some(Role::Admin) => required.contains(Role::Admin) || required.contains(Role::User),
        Some(Role::User) => required.contains(Role::User),
    }
}

/// The outcome of navigating to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The route renders.
    Render(Route),
    /// The console must go to another route instead.
    Redirect(Route),
}

/// Guards navigation to `route` using the route's own role requirement.
pub fn guard(route: Route, session: &Session) -> Navigation {
    guard_with(route, route.required_roles(), session)
}

/// Guards navigation to `route` with an explicit role requirement.
///
/// No session redirects to `/login`; a session with the wrong role redirects
/// to `/dashboard`. The two outcomes are never merged.
pub fn guard_with(route: Route, required: RoleSet, session: &Session) -> Navigation {
    if route.is_public() {
        return Navigation::Render(route);
    }

    if !session.is_authenticated || session.role.is_none() {
        tracing::debug!("🚫 {} requires a session, redirecting to login", route);
        return Navigation::Redirect(Route::Login);
    }

    if route == Route::Root {
        return Navigation::Redirect(Route::Dashboard);
    }

    if can_access(required, session.role) {
        tracing::debug!("✅ {} allowed for {:?}", route, session.role);
        Navigation::Render(route)
    } else {
        tracing::debug!("🚫 {} not allowed for {:?}, redirecting home", route, session.role);
        Navigation::Redirect(Route::Dashboard)
    }
}

/// Renders `content` only when the gate admits `current`.
///
/// Used for actions and sections inside an already rendered view; a denied
/// gate yields `None` and the rest of the view is unaffected.
pub fn gate<T>(required: RoleSet, current: Option<Role>, content: impl FnOnce() -> T) -> Option<T> {
    if can_access(required, current) {
        Some(content())
    } else {
        None
    }
}

/// Checks a submitted action against the role held at submit time.
///
/// # Returns
///
/// `AppError::AuthorizationDenied` without a session, so the caller renders
/// nothing and sends the user back to login; `AppError::Validation` for a
/// signed-in role that may not perform `action`.
pub fn authorize(required: RoleSet, current: Option<Role>, action: impl fmt::Display) -> Result<()> {
    match current {
        None => {
            tracing::warn!("⛔ {} submitted without a session", action);
            Err(AppError::AuthorizationDenied)
        }
        Some(role) if !can_access(required, Some(role)) => Err(AppError::Validation(format!(
            "{} requires the {} role",
            action, Role::Admin
        ))),
        Some(_) => Ok(()),
    }
}
