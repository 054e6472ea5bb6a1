use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::{ClaimWiseError, Result};
use crate::storage::FlagStorage;

/// Storage key of the session flag.
pub const SESSION_FLAG_KEY: &str = "isAuthenticated";

const SESSION_FLAG_VALUE: &str = "true";

/// Credential pair accepted by the login form.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new("admin", "password123")
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Top-level view selected by the session flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Login,
    Dashboard,
}

/// Reads and writes the persisted session flag.
pub struct SessionGate {
    storage: Arc<dyn FlagStorage>,
    credentials: Credentials,
    login_delay: Duration,
}

impl SessionGate {
    pub fn new(storage: Arc<dyn FlagStorage>, credentials: Credentials) -> Self {
        Self {
            storage,
            credentials,
            login_delay: Duration::ZERO,
        }
    }

    /// Simulated round trip before credentials are checked.
    pub fn with_login_delay(mut self, delay: Duration) -> Self {
        self.login_delay = delay;
        self
    }

    /// Only the literal `"true"` counts as logged in.
    pub async fn is_authenticated(&self) -> Result<bool> {
        let flag = self.storage.get(SESSION_FLAG_KEY).await?;
        Ok(flag.as_deref() == Some(SESSION_FLAG_VALUE))
    }

    pub async fn current_view(&self) -> Result<View> {
        Ok(if self.is_authenticated().await? {
            View::Dashboard
        } else {
            View::Login
        })
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        if !self.login_delay.is_zero() {
            tokio::time::sleep(self.login_delay).await;
        }

        if !self.credentials.matches(username, password) {
            warn!(username = %username, "login rejected");
            return Err(ClaimWiseError::InvalidCredentials);
        }

        self.storage
            .set(SESSION_FLAG_KEY, SESSION_FLAG_VALUE)
            .await?;
        info!(username = %username, "session opened");
        Ok(())
    }

    pub async fn logout(&self) -> Result<()> {
        self.storage.remove(SESSION_FLAG_KEY).await?;
        info!("session closed");
        Ok(())
    }
}
