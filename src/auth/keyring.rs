//
//  discourse-api
//  auth/keyring.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Secure Credential Storage Module
//!
//! Stores API keys and SSO secrets in the system's native keyring
//! (Keychain on macOS, Secret Service on Linux, Credential Manager on
//! Windows). The config file never holds secrets.
//!
//! ## Storage Model
//!
//! - **Service**: `discourse-api`
//! - **Entry**: the forum host for the API key, `<host>#sso` for the SSO secret
//!
//! ## Environment Overrides
//!
//! `DISCOURSE_API_KEY` and `DISCOURSE_SSO_SECRET` take precedence over the
//! keyring, which is useful in CI and containers without a secret service.
//!
//! ## Example
//!
//! ```rust,no_run
//! use discourse_api::auth::KeyringStore;
//!
//! fn manage_credentials() -> anyhow::Result<()> {
//!     let store = KeyringStore::new();
//!     store.store_api_key("forum.example.com", "0123456789abcdef")?;
//!
//!     if let Some(key) = store.api_key("forum.example.com")? {
//!         println!("Found key ({} chars)", key.len());
//!     }
//!
//!     store.delete_api_key("forum.example.com")?;
//!     Ok(())
//! }
//! ```

use anyhow::Result;
use keyring::Entry;

/// The service name used to identify this application in the system keyring.
const SERVICE_NAME: &str = "discourse-api";

/// Environment variable overriding the stored API key.
pub const API_KEY_ENV: &str = "DISCOURSE_API_KEY";

/// Environment variable overriding the stored SSO secret.
pub const SSO_SECRET_ENV: &str = "DISCOURSE_SSO_SECRET";

/// Secure credential storage using the system's native keyring service.
///
/// # Notes
///
/// - The keyring may require user interaction on first access.
/// - On Linux, a secret service daemon (GNOME Keyring, KWallet) must be running.
pub struct KeyringStore {
    service: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringStore {
    /// Creates a store under the `discourse-api` service name.
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    /// Stores the API key for `host`, replacing any previous key.
    pub fn store_api_key(&self, host: &str, key: &str) -> Result<()> {
        self.store(host, key)
    }

    /// Returns the API key for `host`, honouring `DISCOURSE_API_KEY`.
    pub fn api_key(&self, host: &str) -> Result<Option<String>> {
        if let Some(key) = env_value(API_KEY_ENV) {
            return Ok(Some(key));
        }
        self.get(host)
    }

    pub fn delete_api_key(&self, host: &str) -> Result<()> {
        self.delete(host)
    }

    /// Stores the SSO secret for `host`.
    pub fn store_sso_secret(&self, host: &str, secret: &str) -> Result<()> {
        self.store(&sso_entry(host), secret)
    }

    /// Returns the SSO secret for `host`, honouring `DISCOURSE_SSO_SECRET`.
    pub fn sso_secret(&self, host: &str) -> Result<Option<String>> {
        if let Some(secret) = env_value(SSO_SECRET_ENV) {
            return Ok(Some(secret));
        }
        self.get(&sso_entry(host))
    }

    pub fn delete_sso_secret(&self, host: &str) -> Result<()> {
        self.delete(&sso_entry(host))
    }

    fn store(&self, entry: &str, secret: &str) -> Result<()> {
        let entry = Entry::new(&self.service, entry)?;
        entry.set_password(secret)?;
        Ok(())
    }

    fn get(&self, entry: &str) -> Result<Option<String>> {
        let entry = Entry::new(&self.service, entry)?;
        match entry.get_password() {
            Ok(password) => Ok(Some(password)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, entry: &str) -> Result<()> {
        let entry = Entry::new(&self.service, entry)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()), // Already deleted
            Err(e) => Err(e.into()),
        }
    }
}

/// Keyring entry name of the SSO secret for `host`.
pub fn sso_entry(host: &str) -> String {
    format!("{}#sso", host)
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sso_entry_is_distinct_from_host() {
        assert_eq!(sso_entry("forum.example.com"), "forum.example.com#sso");
    }
}
