//
//  discourse-api
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Settings of the `discourse` binary, kept in a TOML file under the
//! platform configuration directory:
//!
//! - **Linux**: `~/.config/discourse/config.toml`
//! - **macOS**: `~/Library/Application Support/discourse/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\discourse\config.toml`
//!
//! API keys and SSO secrets never go in this file; they live in the system
//! keyring (see [`crate::auth::KeyringStore`]).
//!
//! ## Example Configuration File
//!
//! ```toml
//! [core]
//! default_host = "forum.example.com"
//!
//! [hosts."forum.example.com"]
//! host = "forum.example.com"
//! protocol = "https"
//! username = "system"
//! timeout_secs = 30
//! content_type = "match-body"
//! ```
//!
//! ## Submodules
//!
//! - [`file`]: Low-level configuration file I/O operations
//! - [`hosts`]: Host normalization

mod file;
mod hosts;

pub use file::*;
pub use hosts::*;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::{ClientConfig, ContentTypePolicy, Protocol};

/// Keys accepted by [`Config::get_host`] and [`Config::set_host`].
pub const HOST_KEYS: &[&str] = &["protocol", "username", "timeout_secs", "content_type"];

/// Global configuration of the `discourse` binary.
///
/// # Examples
///
/// ```rust
/// use discourse_api::config::Config;
///
/// let config = Config::default();
/// assert!(config.core.default_host.is_none());
/// assert!(config.hosts.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub core: CoreConfig,

    /// Keys are normalized hostnames (see [`normalize_host`]).
    #[serde(default)]
    pub hosts: HashMap<String, HostConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CoreConfig {
    /// Host used when `--host` and `DISCOURSE_HOST` are absent.
    #[serde(default)]
    pub default_host: Option<String>,
}

/// Per-forum settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HostConfig {
    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub protocol: Protocol,

    /// Acting user when a command does not name one; `system` if unset.
    #[serde(default)]
    pub username: Option<String>,

    /// Request timeout in seconds; the HTTP client default if unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub content_type: ContentTypePolicy,
}

impl HostConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    /// Builds the client configuration for this host.
    pub fn client_config(&self, api_key: &str, sso_secret: Option<String>) -> ClientConfig {
        let mut config = ClientConfig::new(&self.host, api_key)
            .with_protocol(self.protocol)
            .with_content_type(self.content_type);
        if let Some(username) = &self.username {
            config = config.with_default_username(username);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(secret) = sso_secret {
            config = config.with_sso_secret(secret);
        }
        config
    }
}

impl Config {
    /// Loads the configuration from the default location, or defaults if
    /// the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match read_config_file(path)? {
            Some(content) => Ok(toml::from_str(&content)?),
            None => Ok(Self::default()),
        }
    }

    /// Saves the configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        write_config_file(path, &content)
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn host_config(&self, host: &str) -> Option<&HostConfig> {
        self.hosts.get(&normalize_host(host))
    }

    /// Returns the settings of `host`, creating them if missing.
    ///
    /// A scheme in `host` sets the protocol of a newly created entry.
    pub fn host_config_mut(&mut self, host: &str) -> &mut HostConfig {
        let (protocol, host) = split_protocol(host);
        self.hosts.entry(host.clone()).or_insert_with(|| HostConfig {
            protocol: protocol.unwrap_or_default(),
            ..HostConfig::new(host)
        })
    }

    /// Resolves the host to talk to: an explicit value first, then
    /// `core.default_host`.
    pub fn resolve_host(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .map(String::from)
            .or_else(|| self.core.default_host.clone())
    }

    /// Gets a core configuration value by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default_host" => self.core.default_host.clone(),
            _ => None,
        }
    }

    /// Sets a core configuration value by key. Returns `false` for unknown keys.
    pub fn set(&mut self, key: &str, value: String) -> bool {
        match key {
            "default_host" => {
                self.core.default_host = Some(normalize_host(&value));
                true
            }
            _ => false,
        }
    }

    /// Gets a per-host value by key (see [`HOST_KEYS`]).
    pub fn get_host(&self, host: &str, key: &str) -> Option<String> {
        let config = self.host_config(host)?;
        match key {
            "protocol" => Some(config.protocol.to_string()),
            "username" => config.username.clone(),
            "timeout_secs" => config.timeout_secs.map(|s| s.to_string()),
            "content_type" => Some(
                match config.content_type {
                    ContentTypePolicy::MatchBody => "match-body",
                    ContentTypePolicy::Legacy => "legacy",
                }
                .to_string(),
            ),
            _ => None,
        }
    }

    /// Sets a per-host value by key.
    ///
    /// # Errors
    ///
    /// Fails on unknown keys and on values that do not parse.
    pub fn set_host(&mut self, host: &str, key: &str, value: &str) -> Result<()> {
        let config = self.host_config_mut(host);
        match key {
            "protocol" => {
                config.protocol = value.parse().map_err(anyhow::Error::msg)?;
            }
            "username" => config.username = Some(value.to_string()),
            "timeout_secs" => config.timeout_secs = Some(value.parse()?),
            "content_type" => {
                config.content_type = match value {
                    "match-body" => ContentTypePolicy::MatchBody,
                    "legacy" => ContentTypePolicy::Legacy,
                    other => bail!("Unknown content type policy: {}", other),
                }
            }
            other => bail!("Unknown host key: {} (expected one of {:?})", other, HOST_KEYS),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_get_set() {
        let mut config = Config::default();
        assert!(config.set("default_host", "https://Forum.Example.com/".to_string()));
        assert_eq!(config.get("default_host").as_deref(), Some("forum.example.com"));
        assert!(!config.set("unknown_key", "value".to_string()));
        assert_eq!(config.resolve_host(None).as_deref(), Some("forum.example.com"));
        assert_eq!(config.resolve_host(Some("other.org")).as_deref(), Some("other.org"));
    }

    #[test]
    fn test_host_settings() {
        let mut config = Config::default();
        config.host_config_mut("http://localhost:3000");
        config.set_host("localhost:3000", "username", "admin").unwrap();
        config.set_host("localhost:3000", "timeout_secs", "15").unwrap();
        config.set_host("localhost:3000", "content_type", "legacy").unwrap();

        assert_eq!(config.get_host("localhost:3000", "protocol").as_deref(), Some("http"));
        assert_eq!(config.get_host("localhost:3000", "content_type").as_deref(), Some("legacy"));
        assert!(config.set_host("localhost:3000", "timeout_secs", "soon").is_err());
        assert!(config.set_host("localhost:3000", "colour", "red").is_err());

        let client = config.host_config("localhost:3000").unwrap().client_config("key", None);
        assert_eq!(client.protocol, Protocol::Http);
        assert_eq!(client.default_username, "admin");
        assert_eq!(client.timeout, Some(Duration::from_secs(15)));
        assert_eq!(client.content_type, ContentTypePolicy::Legacy);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.set("default_host", "forum.example.com".to_string());
        config.set_host("forum.example.com", "username", "bot").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
