use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use zeroize::Zeroizing;

use crate::crypto::token;
use crate::error::{AppError, Result};
use crate::models::claims::{Claims, Role};
use crate::models::session::Session;
use crate::repositories::credential::CredentialStore;

/// What the core holds while authenticated.
struct Held {
    claims: Claims,
    credential: Zeroizing<String>,
}

/// The authorization core.
///
/// Owns the decoded session and the credential slot behind one lock, so the
/// store and the in-memory session always agree: the slot holds a credential
/// exactly when the core is authenticated. Every transition is published to
/// subscribers.
pub struct SessionCore {
    store: Arc<dyn CredentialStore>,
    held: Mutex<Option<Held>>,
    events: watch::Sender<Session>,
}

impl SessionCore {
    /// Builds the core from whatever the slot holds at process start.
    ///
    /// A credential that fails to decode is treated as corrupt: the slot is
    /// cleared and the core starts anonymous. Nothing is surfaced to views.
    ///
    /// # Arguments
    ///
    /// * `store` - The persisted credential slot.
    ///
    /// # Returns
    ///
    /// The shared `SessionCore`.
    pub async fn start(store: Arc<dyn CredentialStore>) -> Arc<Self> {
        let core = Arc::new(Self {
            store,
            held: Mutex::new(None),
            events: watch::channel(Session::anonymous()).0,
        });

        let stored = match core.store.read().await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("❌ Could not read stored credential, starting anonymous: {}", e);
                core.sign_out().await;
                return core;
            }
        };

        let Some(raw) = stored
            .filter(|raw| !raw.trim().is_empty())
            .map(Zeroizing::new)
        else {
            tracing::debug!("No stored credential, starting anonymous");
            return core;
        };

        match token::decode(&raw) {
            Ok(claims) => {
                let mut held = core.held.lock().await;
                core.events.send_replace(Session::from_claims(&claims));
                tracing::info!("✅ Session restored for {} ({})", claims.email, claims.role);
                *held = Some(Held { claims, credential: raw });
            }
            Err(e) => {
                tracing::warn!("⚠️ Stored credential is corrupt, clearing it: {}", e);
                core.sign_out().await;
            }
        }

        core
    }

    /// Adopts a freshly issued credential.
    ///
    /// On success the credential is persisted and the core becomes
    /// authenticated. A credential that fails to decode logs the core out
    /// instead of leaving a half-authenticated state.
    ///
    /// # Arguments
    ///
    /// * `raw` - The credential returned by the login endpoint.
    ///
    /// # Returns
    ///
    /// The decoded `Claims`, `AppError::Decode` for a bad credential, or a
    /// storage error if the slot could not be written (state unchanged).
    pub async fn login(&self, raw: &str) -> Result<Claims> {
        let claims = match token::decode(raw) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!("⚠️ Login credential rejected, logging out: {}", e);
                self.sign_out().await;
                return Err(e);
            }
        };

        let mut held = self.held.lock().await;

        self.store.persist(raw).await.map_err(|e| {
            tracing::error!("❌ Failed to persist credential: {}", e);
            e
        })?;

        *held = Some(Held {
            claims: claims.clone(),
            credential: Zeroizing::new(raw.to_string()),
        });
        self.events.send_replace(Session::from_claims(&claims));

        tracing::info!("🔓 Logged in as {} ({})", claims.email, claims.role);
        Ok(claims)
    }

    /// Clears the slot and returns to the anonymous state.
    ///
    /// Idempotent. When the slot refuses to clear it is overwritten with a
    /// blank credential, which reads back as an empty slot.
    ///
    /// # Returns
    ///
    /// `AppError::Storage` if the slot could be neither cleared nor blanked.
    /// The in-memory session is anonymous either way.
    pub async fn logout(&self) -> Result<()> {
        let mut held = self.held.lock().await;

        let forgotten = self.forget_stored().await;

        let was_authenticated = held.take().is_some();
        self.events.send_if_modified(|session| {
            if *session == Session::anonymous() {
                false
            } else {
                *session = Session::anonymous();
                true
            }
        });

        if was_authenticated {
            tracing::info!("🔒 Logged out");
        }
        forgotten
    }

    /// Logs out on behalf of the core itself, where nobody can act on a
    /// storage failure beyond recording it.
    pub(crate) async fn sign_out(&self) {
        if let Err(e) = self.logout().await {
            tracing::error!("❌ {}", e);
        }
    }

    async fn forget_stored(&self) -> Result<()> {
        let Err(clear_err) = self.store.clear().await else {
            return Ok(());
        };
        tracing::warn!("⚠️ Could not clear stored credential, blanking it: {}", clear_err);

        self.store.persist("").await.map_err(|blank_err| {
            AppError::Storage(format!(
                "stored credential could not be cleared ({}) or blanked ({})",
                clear_err, blank_err
            ))
        })
    }

    /// The current session.
    pub fn snapshot(&self) -> Session {
        self.events.borrow().clone()
    }

    /// Receives every session change from now on.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.events.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.events.borrow().is_authenticated
    }

    pub fn role(&self) -> Option<Role> {
        self.events.borrow().role
    }

    pub fn email(&self) -> Option<String> {
        self.events.borrow().email.clone()
    }

    /// The decoded claims, when authenticated.
    pub async fn claims(&self) -> Option<Claims> {
        self.held.lock().await.as_ref().map(|held| held.claims.clone())
    }

    /// The raw credential to attach to outgoing requests.
    pub async fn credential(&self) -> Option<Zeroizing<String>> {
        self.held
            .lock()
            .await
            .as_ref()
            .map(|held| held.credential.clone())
    }

    /// Whether the held credential has expired at `now`.
    ///
    /// Never consulted for access decisions.
    pub async fn is_expired(&self, now: chrono::DateTime<chrono::Utc>) -> Option<bool> {
        self.held
            .lock()
            .await
            .as_ref()
            .map(|held| token::is_expired(&held.claims, now))
    }
}
