use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// The stored or received credential could not be decoded into claims.
    #[error("Credential decode error: {0}")]
    Decode(String),

    /// The server refused the request with HTTP 403.
    #[error("Authorization denied")]
    AuthorizationDenied,

    /// A network, 5xx or otherwise non-successful response.
    #[error("Fetch failed ({}): {message}", fetch_status(.status))]
    Fetch {
        status: Option<u16>,
        message: String,
    },

    /// The login endpoint rejected the supplied credentials.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The credential slot could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// An I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A Redis error.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

fn fetch_status(status: &Option<u16>) -> String {
    status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "network".to_string())
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Whether this error ends the current session.
    ///
    /// Decode failures and 403 responses are recovered centrally by logging
    /// out; views never render them as messages.
    pub fn is_session_fatal(&self) -> bool {
        matches!(self, AppError::Decode(_) | AppError::AuthorizationDenied)
    }

    /// The inline message a view shows for this error, if any.
    ///
    /// # Arguments
    ///
    /// * `fallback` - The view-specific text used for transient failures.
    ///
    /// # Returns
    ///
    /// `None` for session-fatal errors, otherwise a human-readable message.
    pub fn user_message(&self, fallback: &str) -> Option<String> {
        if self.is_session_fatal() {
            return None;
        }
        match self {
            AppError::Validation(msg) => {
                tracing::debug!("Validation error: {}", msg);
                Some(msg.clone())
            }
            AppError::Authentication(msg) => {
                tracing::warn!("Authentication failed: {}", msg);
                Some(msg.clone())
            }
            other => {
                tracing::error!("{}", other);
                Some(fallback.to_string())
            }
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Fetch {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        AppError::Decode(e.to_string())
    }
}

impl From<garde::Report> for AppError {
    fn from(report: garde::Report) -> Self {
        let message = report
            .iter()
            .map(|(path, error)| {
                let path = path.to_string();
                if path.is_empty() {
                    error.to_string()
                } else {
                    format!("{}: {}", path, error)
                }
            })
            .collect::<Vec<_>>()
            .join("; ");
        AppError::Validation(message)
    }
}
