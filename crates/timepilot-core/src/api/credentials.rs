//! Token persistence.
//!
//! Tokens are kept as one JSON value per account in the OS keyring.
//! [`MemoryStore`] backs tests and one-shot sessions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;

use crate::error::CredentialError;

const SERVICE: &str = "timepilot";
const ACCOUNT: &str = "auth_tokens";

/// Access/refresh token pair issued by the backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

impl fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthTokens")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Where the client keeps its tokens between requests.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<AuthTokens>, CredentialError>;
    fn save(&self, tokens: &AuthTokens) -> Result<(), CredentialError>;
    /// Removing tokens that are not there is not an error.
    fn clear(&self) -> Result<(), CredentialError>;
}

/// Thin wrapper around the OS keyring.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
    account: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self::with_account(ACCOUNT)
    }

    /// Separate accounts let dev and production logins coexist.
    pub fn with_account(account: &str) -> Self {
        Self {
            service: SERVICE.to_string(),
            account: account.to_string(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, CredentialError> {
        Ok(keyring::Entry::new(&self.service, &self.account)?)
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeyringStore {
    fn load(&self) -> Result<Option<AuthTokens>, CredentialError> {
        match self.entry()?.get_password() {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, tokens: &AuthTokens) -> Result<(), CredentialError> {
        let json = serde_json::to_string(tokens)?;
        self.entry()?.set_password(&json)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store; forgets everything on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tokens: Mutex<Option<AuthTokens>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: AuthTokens) -> Self {
        Self {
            tokens: Mutex::new(Some(tokens)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<AuthTokens>> {
        self.tokens.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Result<Option<AuthTokens>, CredentialError> {
        Ok(self.slot().clone())
    }

    fn save(&self, tokens: &AuthTokens) -> Result<(), CredentialError> {
        *self.slot() = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        *self.slot() = None;
        Ok(())
    }
}
