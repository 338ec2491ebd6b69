//
//  discourse-api
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod api;
mod auth;
mod completion;
mod config;
mod sso;

pub use api::ApiCommand;
pub use auth::AuthCommand;
pub use completion::CompletionCommand;
pub use config::ConfigCommand;
pub use sso::SsoCommand;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::api::DiscourseClient;
use crate::auth::KeyringStore;
use crate::config::{normalize_host, split_protocol, Config, HostConfig};

#[derive(Parser, Debug)]
#[command(
    name = "discourse",
    version,
    about = "Call a Discourse forum's REST API from the command line",
    long_about = "discourse sends authenticated requests to a Discourse forum.\n\n\
                  API keys and SSO secrets are kept in the system keyring.",
    propagate_version = true,
    after_help = "Use 'discourse <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Forum host (defaults to core.default_host)
    #[arg(long, global = true, env = "DISCOURSE_HOST")]
    pub host: Option<String>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log every request with its parameters
    #[arg(long, global = true, env = "DISCOURSE_DEBUG_REQUESTS")]
    pub debug_requests: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage API keys and SSO secrets
    #[command(visible_alias = "login")]
    Auth(AuthCommand),

    /// Make an API request
    Api(ApiCommand),

    /// Provision users through DiscourseConnect
    Sso(SsoCommand),

    /// Read and write configuration
    Config(ConfigCommand),

    /// Generate shell completions
    Completion(CompletionCommand),

    /// Show version information
    Version,
}

/// Resolves the target host from `--host`, `DISCOURSE_HOST` or the config.
pub(crate) fn resolve_host(config: &Config, global: &GlobalOptions) -> Result<String> {
    config
        .resolve_host(global.host.as_deref())
        .map(|h| normalize_host(&h))
        .context("No host given. Use --host, DISCOURSE_HOST or 'discourse config set default_host <host>'")
}

/// Builds a client for the resolved host from its config and keyring entries.
pub(crate) fn build_client(global: &GlobalOptions) -> Result<DiscourseClient> {
    let config = Config::load()?;
    let host = resolve_host(&config, global)?;

    let keyring = KeyringStore::new();
    let api_key = keyring.api_key(&host)?.with_context(|| {
        format!(
            "Not authenticated with {}. Run 'discourse auth login' first.",
            host
        )
    })?;
    let sso_secret = keyring.sso_secret(&host)?;

    let mut host_config = config
        .host_config(&host)
        .cloned()
        .unwrap_or_else(|| HostConfig::new(&host));
    if let Some(protocol) = global.host.as_deref().and_then(|h| split_protocol(h).0) {
        host_config.protocol = protocol;
    }

    let client = DiscourseClient::new(host_config.client_config(&api_key, sso_secret))?;
    client.set_debug_get_requests(global.debug_requests);
    client.set_debug_write_requests(global.debug_requests);
    Ok(client)
}

/// Splits `key=value`.
pub(crate) fn parse_field(field: &str) -> Result<(String, String)> {
    let (key, value) = field
        .split_once('=')
        .with_context(|| format!("Invalid field format: {}. Expected key=value", field))?;
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("raw=a=b").unwrap(),
            ("raw".to_string(), "a=b".to_string())
        );
        assert!(parse_field("novalue").is_err());
    }

    #[test]
    fn test_resolve_host_prefers_flag() {
        let mut config = Config::default();
        config.set("default_host", "forum.example.com".to_string());

        let global = GlobalOptions {
            host: Some("HTTPS://Other.org/".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_host(&config, &global).unwrap(), "other.org");
        assert_eq!(
            resolve_host(&config, &GlobalOptions::default()).unwrap(),
            "forum.example.com"
        );
        assert!(resolve_host(&Config::default(), &GlobalOptions::default()).is_err());
    }
}
