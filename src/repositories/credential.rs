use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use zeroize::Zeroizing;

use crate::error::{AppError, Result};

/// The single persisted slot holding the raw credential.
///
/// Implementations enforce no expiry of their own. A blank credential is
/// what a slot that refused to clear is overwritten with; the session core
/// reads it as an empty slot.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Stores `raw`, replacing whatever was there.
    async fn persist(&self, raw: &str) -> Result<()>;

    /// Returns the stored credential, if any.
    async fn read(&self) -> Result<Option<String>>;

    /// Empties the slot. Clearing an empty slot is not an error.
    async fn clear(&self) -> Result<()>;
}

/// Derives a storage key that is stable for one API origin.
///
/// # Arguments
///
/// * `origin` - The API origin, e.g. `http://localhost:3005`.
///
/// # Returns
///
/// A short hex string safe to use as a file name or Redis key suffix.
pub fn origin_key(origin: &str) -> String {
    let digest = Sha256::digest(origin.trim_end_matches('/').as_bytes());
    hex::encode(&digest[..8])
}

/// A credential slot backed by one file per API origin.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store writing to `dir/<origin key>.token`.
    pub fn for_origin(dir: &Path, origin: &str) -> Self {
        Self {
            path: dir.join(format!("{}.token", origin_key(origin))),
        }
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn persist(&self, raw: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("token.tmp");
        tokio::fs::write(&tmp, raw.as_bytes()).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600)).await?;
        }

        tokio::fs::rename(&tmp, &self.path).await?;
        tracing::debug!("💾 Credential written to {}", self.path.display());
        Ok(())
    }

    async fn read(&self) -> Result<Option<String>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let bytes = Zeroizing::new(bytes);
                let raw = String::from_utf8(bytes.to_vec()).map_err(|_| {
                    AppError::Storage(format!("{} is not valid UTF-8", self.path.display()))
                })?;
                Ok(Some(raw))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!("🧹 Credential file removed: {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// A process-local slot. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Zeroizing<String>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn persist(&self, raw: &str) -> Result<()> {
        *self.slot.lock().await = Some(Zeroizing::new(raw.to_string()));
        Ok(())
    }

    async fn read(&self) -> Result<Option<String>> {
        Ok(self.slot.lock().await.as_ref().map(|raw| raw.to_string()))
    }

    async fn clear(&self) -> Result<()> {
        self.slot.lock().await.take();
        Ok(())
    }
}

/// A slot kept in Redis under `crm:credential:<origin key>`.
pub struct RedisCredentialStore {
    redis: ConnectionManager,
    key: String,
}

impl RedisCredentialStore {
    /// Connects to `redis_url` and scopes the slot to `origin`.
    pub async fn connect(redis_url: &str, origin: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;
        tracing::info!("✅ Redis Connection Manager initialized for credential storage");

        Ok(Self {
            redis,
            key: format!("crm:credential:{}", origin_key(origin)),
        })
    }
}

#[async_trait]
impl CredentialStore for RedisCredentialStore {
    async fn persist(&self, raw: &str) -> Result<()> {
        let mut redis = self.redis.clone();
        let _: () = redis.set(&self.key, raw).await.map_err(|e| {
            tracing::error!("❌ Redis set failed: {}", e);
            AppError::Redis(e)
        })?;
        Ok(())
    }

    async fn read(&self) -> Result<Option<String>> {
        let mut redis = self.redis.clone();
        let raw: Option<String> = redis.get(&self.key).await?;
        Ok(raw)
    }

    async fn clear(&self) -> Result<()> {
        let mut redis = self.redis.clone();
        let _: () = redis.del(&self.key).await?;
        Ok(())
    }
}
