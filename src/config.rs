use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::helpers::table::ROWS_PER_PAGE_OPTIONS;

/// Where the credential slot lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    /// One file per API origin under `session_dir`.
    File,
    /// Process memory only.
    Memory,
    /// A Redis key per API origin.
    Redis,
}

impl FromStr for SessionBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(SessionBackend::File),
            "memory" => Ok(SessionBackend::Memory),
            "redis" => Ok(SessionBackend::Redis),
            other => anyhow::bail!("unknown SESSION_BACKEND '{}' (expected file, memory or redis)", other),
        }
    }
}

/// Validates `API_BASE_URL`.
///
/// Endpoints are joined as absolute paths (`/api/...`), so the value must be
/// an origin: scheme, host and optional port, with nothing after them.
fn api_origin(raw: &str) -> Result<String> {
    let url = reqwest::Url::parse(raw)
        .with_context(|| format!("API_BASE_URL '{}' is not a valid URL", raw))?;

    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        anyhow::bail!(
            "API_BASE_URL '{}' must be an origin like http://host:3005, without a path",
            raw
        );
    }

    Ok(raw.trim_end_matches('/').to_string())
}

/// The application's configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// The origin of the collections API.
    pub api_base_url: String,
    /// Where the credential is kept.
    pub session_backend: SessionBackend,
    /// Directory for the file backend.
    pub session_dir: PathBuf,
    /// The URL of the Redis server, for the redis backend.
    pub redis_url: String,
    /// Per-request timeout; `None` keeps the transport default.
    pub request_timeout: Option<Duration>,
    /// Rows shown per page in list views.
    pub rows_per_page: usize,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let api_base_url = api_origin(
            &env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3005".to_string()),
        )?;

        let session_backend = env::var("SESSION_BACKEND")
            .unwrap_or_else(|_| "file".to_string())
            .parse()?;

        let session_dir = match env::var("SESSION_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => env::var("HOME")
                .map(|home| PathBuf::from(home).join(".crm-console"))
                .unwrap_or_else(|_| PathBuf::from(".crm-console")),
        };

        let request_timeout = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(secs) => Some(Duration::from_secs(
                secs.parse().context("Invalid REQUEST_TIMEOUT_SECS")?,
            )),
            Err(_) => None,
        };

        let rows_per_page: usize = env::var("ROWS_PER_PAGE")
            .unwrap_or_else(|_| ROWS_PER_PAGE_OPTIONS[0].to_string())
            .parse()
            .context("Invalid ROWS_PER_PAGE")?;
        if !ROWS_PER_PAGE_OPTIONS.contains(&rows_per_page) {
            anyhow::bail!("ROWS_PER_PAGE must be one of {:?}", ROWS_PER_PAGE_OPTIONS);
        }

        Ok(Self {
            api_base_url,
            session_backend,
            session_dir,
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            request_timeout,
            rows_per_page,
        })
    }

    /// A file-backed configuration pointing at `api_base_url`.
    pub fn for_origin(api_base_url: impl Into<String>, session_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            session_backend: SessionBackend::File,
            session_dir: session_dir.into(),
            redis_url: "redis://127.0.0.1:6379".to_string(),
            request_timeout: None,
            rows_per_page: ROWS_PER_PAGE_OPTIONS[0],
        }
    }
}
