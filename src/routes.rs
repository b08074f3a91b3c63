use std::fmt;

use crate::middleware_layer::access::{Navigation, RoleSet, guard};
use crate::models::session::Session;

/// The console's navigable views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Root,
    Dashboard,
    Users,
    Employees,
    Products,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Root => "/",
            Route::Dashboard => "/dashboard",
            Route::Users => "/users",
            Route::Employees => "/employees",
            Route::Products => "/products",
        }
    }

    /// Matches a path exactly (a trailing slash is ignored).
    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim();
        let trimmed = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };

        match trimmed {
            "/login" => Some(Route::Login),
            "/" | "" => Some(Route::Root),
            "/dashboard" => Some(Route::Dashboard),
            "/users" => Some(Route::Users),
            "/employees" => Some(Route::Employees),
            "/products" => Some(Route::Products),
            _ => None,
        }
    }

    pub fn is_public(self) -> bool {
        matches!(self, Route::Login)
    }

    /// Roles allowed to navigate here.
    ///
    /// Every protected view admits both roles; ADMIN-only restrictions live on
    /// the create actions inside the views.
    pub fn required_roles(self) -> RoleSet {
        RoleSet::ALL
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// An action rendered inside a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    NewUser,
    NewEmployee,
    AddProduct,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::NewUser => "New User",
            Action::NewEmployee => "New Employee",
            Action::AddProduct => "Add Product",
        }
    }

    /// Every create action is restricted to administrators.
    pub fn required_roles(self) -> RoleSet {
        match self {
            Action::NewUser | Action::NewEmployee | Action::AddProduct => RoleSet::ADMIN_ONLY,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A sidebar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub title: &'static str,
    pub route: Route,
}

/// The sidebar, in display order.
pub const SIDEBAR_MENU: [MenuItem; 4] = [
    MenuItem { title: "Dashboard", route: Route::Dashboard },
    MenuItem { title: "Users", route: Route::Users },
    MenuItem { title: "Employees", route: Route::Employees },
    MenuItem { title: "Products", route: Route::Products },
];

/// The sidebar entries to show; empty without a session.
pub fn sidebar(session: &Session) -> &'static [MenuItem] {
    if session.is_authenticated {
        &SIDEBAR_MENU
    } else {
        &[]
    }
}

/// Follows redirects from `path` until a view renders.
///
/// Unknown paths go to `/`, which in turn lands on the dashboard or login.
pub fn resolve(path: &str, session: &Session) -> Route {
    let mut route = Route::parse(path).unwrap_or_else(|| {
        tracing::debug!("Unknown path {:?}, redirecting to /", path);
        Route::Root
    });

    // Each route redirects at most twice (/ -> /dashboard -> render).
    for _ in 0..4 {
        match guard(route, session) {
            Navigation::Render(target) => return target,
            Navigation::Redirect(target) => route = target,
        }
    }

    Route::Login
}
