use crate::error::Result;
use crate::helpers::table::Pagination;
use crate::middleware_layer::access::{authorize, gate};
use crate::models::claims::Role;
use crate::models::user::{NewUser, User};
use crate::routes::Action;
use crate::services::api::ApiClient;
use crate::validation::forms::validate_new_user;

pub const FETCH_FAILED: &str = "Failed to fetch users. Please try again.";
pub const ADD_FAILED: &str = "Failed to add user. Please try again.";

/// The users list view.
#[derive(Debug, Default)]
pub struct UsersView {
    pub users: Vec<User>,
    pub error: Option<String>,
    pub pagination: Pagination,
}

impl UsersView {
    pub fn new(pagination: Pagination) -> Self {
        Self { pagination, ..Self::default() }
    }

    /// Loads the users list. Any failure leaves the list empty.
    ///
    /// A 403 has already ended the session inside the client; the view just
    /// shows nothing and the next navigation lands on the login page.
    pub async fn load(&mut self, api: &ApiClient) {
        match api.fetch_users().await {
            Ok(users) => {
                tracing::debug!("👥 Loaded {} users", users.len());
                self.users = users;
                self.error = None;
            }
            Err(e) => {
                self.users.clear();
                self.error = e.user_message(FETCH_FAILED);
            }
        }
    }

    /// The create actions the current role may see.
    pub fn actions(&self, role: Option<Role>) -> Vec<Action> {
        gate(Action::NewUser.required_roles(), role, || Action::NewUser)
            .into_iter()
            .collect()
    }

    /// Registers a user and appends it to the list.
    ///
    /// # Arguments
    ///
    /// * `api` - The collections client. Its session decides, at submit
    ///   time, whether the caller is an administrator.
    /// * `form` - The new user's email, password and role.
    ///
    /// # Returns
    ///
    /// The created `User`. On failure the inline error is set as well.
    pub async fn add(&mut self, api: &ApiClient, form: NewUser) -> Result<User> {
        let result = Self::try_add(api, form).await;
        match &result {
            Ok(user) => {
                self.users.push(user.clone());
                self.error = None;
            }
            Err(e) => self.error = e.user_message(ADD_FAILED),
        }
        result
    }

    async fn try_add(api: &ApiClient, form: NewUser) -> Result<User> {
        authorize(Action::NewUser.required_roles(), api.session().role(), Action::NewUser)?;
        validate_new_user(&form)?;
        api.register(&form).await
    }

    /// The rows on the current page.
    pub fn page(&self) -> &[User] {
        self.pagination.slice(&self.users)
    }
}
