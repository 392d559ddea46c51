//! Credential storage backed by the system keychain

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;

const SERVICE: &str = "qa-assistant";

/// Keychain entry holding the direct-provider API key.
pub const API_KEY_ENTRY: &str = "api-key";
/// Keychain entry holding the relay script identifier.
pub const RELAY_SCRIPT_ENTRY: &str = "relay-script-id";

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("invalid credential: {0}")]
    Invalid(String),
    #[error("keychain access failed: {0}")]
    Storage(String),
}

/// Persistent key-value backend for secrets. Implemented by the system
/// keychain and by an in-memory fake for tests.
pub trait SecretStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialError>;
    fn set(&self, key: &str, value: &str) -> Result<(), CredentialError>;
}

/// System keychain backend.
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE.to_string(),
        }
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry, CredentialError> {
        keyring::Entry::new(&self.service, key)
            .map_err(|e| CredentialError::Storage(format!("failed to access keyring: {e}")))
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(CredentialError::Storage(format!(
                "failed to read credential: {e}"
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        self.entry(key)?
            .set_password(value)
            .map_err(|e| CredentialError::Storage(format!("failed to save credential: {e}")))
    }
}

/// In-memory backend so tests can run without a keychain.
#[derive(Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl SecretStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialError> {
        let values = self
            .values
            .lock()
            .map_err(|_| CredentialError::Storage("store lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| CredentialError::Storage("store lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Shape requirements for a candidate credential, by backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialPolicy {
    /// API key for a named direct provider.
    Provider(String),
    /// Relay script identifier.
    RelayScript,
}

/// Check a candidate credential against a policy.
pub fn validate(policy: &CredentialPolicy, candidate: &str) -> Result<(), CredentialError> {
    if candidate.is_empty() {
        return Err(CredentialError::Invalid(
            "credential must not be empty".to_string(),
        ));
    }
    match policy {
        CredentialPolicy::Provider(name) if name == "openai" => {
            if candidate.starts_with("sk-") && candidate.len() > 20 {
                Ok(())
            } else {
                Err(CredentialError::Invalid(
                    "OpenAI keys start with \"sk-\" and are longer than 20 characters"
                        .to_string(),
                ))
            }
        }
        CredentialPolicy::Provider(_) => {
            if candidate.len() > 5 {
                Ok(())
            } else {
                Err(CredentialError::Invalid(
                    "API key looks too short".to_string(),
                ))
            }
        }
        CredentialPolicy::RelayScript => Ok(()),
    }
}

/// One persisted credential with an in-memory copy for the session.
///
/// `save` validates and writes through before updating the cached value;
/// a failed save leaves both the store and the cache untouched.
pub struct CredentialStore {
    store: Box<dyn SecretStore>,
    entry: &'static str,
    policy: CredentialPolicy,
    current: String,
}

impl CredentialStore {
    /// Store for the direct-provider API key.
    pub fn api_key(store: Box<dyn SecretStore>, provider: impl Into<String>) -> Self {
        Self {
            store,
            entry: API_KEY_ENTRY,
            policy: CredentialPolicy::Provider(provider.into()),
            current: String::new(),
        }
    }

    /// Store for the relay script identifier.
    pub fn relay_script(store: Box<dyn SecretStore>) -> Self {
        Self {
            store,
            entry: RELAY_SCRIPT_ENTRY,
            policy: CredentialPolicy::RelayScript,
            current: String::new(),
        }
    }

    /// Read the persisted value. An absent entry is a valid initial state
    /// and yields an empty credential.
    pub fn load(&mut self) -> Result<(), CredentialError> {
        self.current = self.store.get(self.entry)?.unwrap_or_default();
        Ok(())
    }

    pub fn save(&mut self, candidate: &str) -> Result<(), CredentialError> {
        validate(&self.policy, candidate)?;
        self.store.set(self.entry, candidate)?;
        self.current = candidate.to_string();
        Ok(())
    }

    pub fn current(&self) -> &str {
        &self.current
    }
}
