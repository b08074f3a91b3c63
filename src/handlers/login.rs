use crate::error::{AppError, Result};
use crate::models::claims::Claims;
use crate::models::user::LoginRequest;
use crate::services::api::ApiClient;
use crate::services::session::SessionCore;
use crate::validation::forms::validate_login;

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// The login form.
#[derive(Debug, Default)]
pub struct LoginView {
    pub error: Option<String>,
}

impl LoginView {
    /// Submits email and password and adopts the returned credential.
    ///
    /// Every failure shows the same message, except a credential that fails
    /// to decode: the session core has already logged out and nothing is shown.
    ///
    /// # Arguments
    ///
    /// * `api` - The collections client.
    /// * `session` - The session core that takes the credential.
    /// * `email` - The submitted email.
    /// * `password` - The submitted password.
    ///
    /// # Returns
    ///
    /// The signed-in user's `Claims`.
    pub async fn submit(
        &mut self,
        api: &ApiClient,
        session: &SessionCore,
        email: &str,
        password: &str,
    ) -> Result<Claims> {
        let form = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        let result = sign_in(api, session, &form).await;

        self.error = match &result {
            Ok(_) => None,
            Err(AppError::Decode(_)) => None,
            Err(e) => {
                tracing::warn!("❌ Login failed for {}: {}", form.email, e);
                Some(INVALID_CREDENTIALS.to_string())
            }
        };
        result
    }
}

async fn sign_in(api: &ApiClient, session: &SessionCore, form: &LoginRequest) -> Result<Claims> {
    validate_login(form)?;
    let response = api.login(form).await?;
    session.login(&response.token).await
}
