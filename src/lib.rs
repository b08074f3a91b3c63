//! Role-gated administrative console for users, employees and products.
//!
//! The session core (`services::session`) owns the decoded credential and is
//! the single source of truth for every gated view; `services::api` talks to
//! the collections API on its behalf.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub mod crypto {
    pub mod token;
}

pub mod models {
    pub mod claims;
    pub mod employee;
    pub mod product;
    pub mod session;
    pub mod user;
}

pub mod repositories {
    pub mod credential;
}

pub mod services {
    pub mod api;
    pub mod session;
}

pub mod handlers {
    pub mod dashboard;
    pub mod employees;
    pub mod login;
    pub mod products;
    pub mod users;
}

pub mod middleware_layer {
    pub mod access;
}

pub mod validation {
    pub mod forms;
}

pub mod helpers {
    pub mod format;
    pub mod table;
}

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;
