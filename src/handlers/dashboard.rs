use crate::models::claims::Role;
use crate::models::session::Session;
use crate::routes::{MenuItem, sidebar};

/// The landing view after login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub email: String,
    pub role: Role,
    pub menu: &'static [MenuItem],
}

impl DashboardView {
    /// Renders the dashboard for an authenticated session.
    pub fn render(session: &Session) -> Option<Self> {
        let role = session.role?;
        Some(Self {
            email: session.email.clone().unwrap_or_default(),
            role,
            menu: sidebar(session),
        })
    }

    pub fn greeting(&self) -> String {
        format!("Welcome, {} ({})", self.email, self.role)
    }
}
