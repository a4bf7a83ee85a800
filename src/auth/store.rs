use std::sync::RwLock;

use anyhow::Result;
use log::{info, warn};
use thiserror::Error;

use crate::db::Database;
use crate::models::{Session, UserType};

/// Storage key holding the serialized active session.
pub const SESSION_STORAGE_KEY: &str = "healthUser";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialPolicy {
    /// Any credentials are accepted, including empty ones.
    #[default]
    AcceptAny,
    RequireNonEmpty,
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("email and password are required")]
    MissingCredentials,
    #[error("failed to persist session: {0}")]
    Storage(String),
}

/// Holds the single active session and mirrors it to durable storage.
pub struct SessionStore {
    db: Database,
    policy: CredentialPolicy,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Restores any persisted session. Missing, unreadable or malformed
    /// records all yield a logged-out store.
    pub async fn open(db: Database) -> Self {
        Self::with_policy(db, CredentialPolicy::default()).await
    }

    pub async fn with_policy(db: Database, policy: CredentialPolicy) -> Self {
        let restored = match db.get_value(SESSION_STORAGE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) => {
                    info!("Restored session for {}", session.email);
                    Some(session)
                }
                Err(err) => {
                    warn!("Ignoring malformed persisted session: {err}");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!("Could not read persisted session, starting logged out: {err:#}");
                None
            }
        };

        Self {
            db,
            policy,
            current: RwLock::new(restored),
        }
    }

    pub fn policy(&self) -> CredentialPolicy {
        self.policy
    }

    pub async fn login(&self, email: &str, password: &str, user_type: UserType) -> Result<Session> {
        if self.policy == CredentialPolicy::RequireNonEmpty
            && (email.trim().is_empty() || password.is_empty())
        {
            return Err(LoginError::MissingCredentials.into());
        }

        let session = Session::synthesize(email, user_type);
        let serialized = serde_json::to_string(&session)?;
        self.db
            .put_value(SESSION_STORAGE_KEY, &serialized)
            .await
            .map_err(|err| LoginError::Storage(format!("{err:#}")))?;

        *self.write_guard() = Some(session.clone());
        info!("{} logged in as {}", session.email, user_type.as_str());
        Ok(session)
    }

    pub async fn logout(&self) -> Result<()> {
        self.db.delete_value(SESSION_STORAGE_KEY).await?;
        let previous = self.write_guard().take();
        if let Some(session) = previous {
            info!("{} logged out", session.email);
        }
        Ok(())
    }

    pub fn current_session(&self) -> Option<Session> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_session().is_some()
    }

    fn write_guard(&self) -> std::sync::RwLockWriteGuard<'_, Option<Session>> {
        match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
