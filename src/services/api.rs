use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::employee::{Employee, NewEmployee};
use crate::models::product::{NewProduct, Product};
use crate::models::user::{LoginRequest, LoginResponse, NewUser, User};
use crate::services::session::SessionCore;

/// Client for the collections API.
///
/// Every request carries the session's credential as a bearer token when one
/// is held. A 403 on an authenticated call ends the session.
#[derive(Clone)]
pub struct ApiClient {
    base: Url,
    http: reqwest::Client,
    session: Arc<SessionCore>,
}

impl ApiClient {
    /// Creates a new `ApiClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The API origin, e.g. `http://localhost:3005`.
    /// * `timeout` - Per-request timeout; `None` keeps the transport default.
    /// * `session` - The session whose credential is attached to requests.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `ApiClient`.
    pub fn new(
        base_url: &str,
        timeout: Option<Duration>,
        session: Arc<SessionCore>,
    ) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("invalid API base URL '{}': {}", base_url, e)))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { base, http, session })
    }

    pub fn session(&self) -> &Arc<SessionCore> {
        &self.session
    }

    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self
            .base
            .join(path)
            .map_err(|e| AppError::Internal(format!("Bad API path {}: {}", path, e)))?;

        let mut request = self.http.request(method.clone(), url);
        match self.session.credential().await {
            Some(credential) => {
                tracing::debug!("➡️ {} {} (bearer)", method, path);
                request = request.bearer_auth(credential.as_str());
            }
            None => tracing::debug!("➡️ {} {} (anonymous)", method, path),
        }
        Ok(request)
    }

    /// Sends `request` and applies the status policy.
    ///
    /// 403 logs the session out and yields `AuthorizationDenied`; anything
    /// else unsuccessful is a transient `Fetch` error left to the view.
    async fn dispatch(&self, request: RequestBuilder, path: &str) -> Result<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("❌ {} failed: {}", path, e);
            AppError::from(e)
        })?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            tracing::warn!("⛔ {} answered 403, ending session", path);
            self.session.sign_out().await;
            return Err(AppError::AuthorizationDenied);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body
            };
            tracing::error!("❌ {} answered {}: {}", path, status, message);
            return Err(AppError::Fetch {
                status: Some(status.as_u16()),
                message,
            });
        }

        Ok(response)
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let request = self.request(Method::GET, path).await?;
        let response = self.dispatch(request, path).await?;
        let body: serde_json::Value = response.json().await?;

        match body {
            serde_json::Value::Array(_) => serde_json::from_value(body).map_err(|e| AppError::Fetch {
                status: None,
                message: format!("unexpected {} payload: {}", path, e),
            }),
            other => {
                tracing::warn!("⚠️ {} returned a non-list body ({}), treating as empty", path, kind(&other));
                Ok(Vec::new())
            }
        }
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let request = self.request(Method::POST, path).await?.json(body);
        let response = self.dispatch(request, path).await?;
        Ok(response.json().await?)
    }

    /// Exchanges email and password for a credential.
    ///
    /// Any failure other than a transport error reads as bad credentials.
    /// The caller hands the returned token to `SessionCore::login`.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse> {
        let path = "/api/users/login";
        let request = self.request(Method::POST, path).await?.json(credentials);
        let response = request.send().await?;

        if !response.status().is_success() {
            tracing::warn!("❌ Login rejected for {}: {}", credentials.email, response.status());
            return Err(AppError::Authentication("Invalid email or password".to_string()));
        }

        let body: LoginResponse = response.json().await.map_err(|e| {
            tracing::warn!("❌ Login response without a token: {}", e);
            AppError::Authentication("Invalid email or password".to_string())
        })?;

        tracing::info!("✅ Login accepted for {}", credentials.email);
        Ok(body)
    }

    pub async fn register(&self, user: &NewUser) -> Result<User> {
        self.post("/api/users/register", user).await
    }

    pub async fn fetch_users(&self) -> Result<Vec<User>> {
        self.get_list("/api/users").await
    }

    pub async fn fetch_employees(&self) -> Result<Vec<Employee>> {
        self.get_list("/api/employees").await
    }

    pub async fn add_employee(&self, employee: &NewEmployee) -> Result<Employee> {
        self.post("/api/employees", employee).await
    }

    pub async fn fetch_products(&self) -> Result<Vec<Product>> {
        self.get_list("/api/products").await
    }

    pub async fn add_product(&self, product: &NewProduct) -> Result<Product> {
        self.post("/api/products", product).await
    }
}

fn kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
