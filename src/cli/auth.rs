//
//  discourse-api
//  cli/auth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Authentication commands.
//!
//! An API key is generated in the forum's admin panel (Admin > API) and is
//! stored in the system keyring under the forum host. The optional SSO
//! secret is the `discourse connect secret` site setting.

use std::io::BufRead;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use console::style;
use dialoguer::{Confirm, Input, Password};

use crate::api::{ApiError, ApiResponse, FormFields};
use crate::auth::{validate_api_key, ApiCredential, KeyringStore};
use crate::config::{normalize_host, split_protocol, Config};

use super::{build_client, resolve_host, GlobalOptions};

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Store an API key (and optionally an SSO secret) for a forum
    Login(LoginArgs),

    /// Remove stored credentials for a forum
    Logout(LogoutArgs),

    /// Show which forums have credentials and check them
    Status,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Forum host, e.g. forum.example.com or http://localhost:3000
    #[arg(long, short = 'H')]
    pub host: Option<String>,

    /// Read the API key from stdin
    #[arg(long)]
    pub with_token: bool,

    /// Also store the SSO secret (prompted)
    #[arg(long)]
    pub sso: bool,

    /// Default acting user for this forum
    #[arg(long, short = 'u')]
    pub username: Option<String>,
}

#[derive(Args, Debug)]
pub struct LogoutArgs {
    #[arg(long, short = 'H')]
    pub host: Option<String>,
}

impl AuthCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            AuthSubcommand::Login(args) => login(args, global),
            AuthSubcommand::Logout(args) => logout(args, global),
            AuthSubcommand::Status => status(global).await,
        }
    }
}

fn login(args: &LoginArgs, global: &GlobalOptions) -> Result<()> {
    let raw_host = match args.host.as_ref().or(global.host.as_ref()) {
        Some(h) => h.clone(),
        None => Input::<String>::new()
            .with_prompt("Discourse host (e.g. forum.example.com)")
            .interact_text()?,
    };
    let (protocol, host) = split_protocol(&raw_host);
    if host.is_empty() {
        bail!("Host cannot be empty");
    }

    let keyring = KeyringStore::new();
    if keyring.api_key(&host)?.is_some()
        && !Confirm::new()
            .with_prompt(format!("An API key for {} is already stored. Replace it?", host))
            .default(false)
            .interact()?
    {
        return Ok(());
    }

    let api_key = if args.with_token {
        read_line_from_stdin()?
    } else {
        Password::new().with_prompt("API key").interact()?
    };
    if !validate_api_key(&api_key) {
        bail!("Invalid API key format");
    }
    keyring
        .store_api_key(&host, &api_key)
        .context("Failed to store API key in keyring")?;

    if args.sso {
        let secret = Password::new().with_prompt("SSO secret").interact()?;
        keyring
            .store_sso_secret(&host, secret.trim())
            .context("Failed to store SSO secret in keyring")?;
    }

    let mut config = Config::load()?;
    let host_config = config.host_config_mut(&raw_host);
    if let Some(protocol) = protocol {
        host_config.protocol = protocol;
    }
    if let Some(username) = &args.username {
        host_config.username = Some(username.clone());
    }
    if config.core.default_host.is_none() {
        config.core.default_host = Some(host.clone());
    }
    config.save()?;

    println!(
        "{} Stored API key {} for {}",
        style("✓").green(),
        ApiCredential::new(api_key).masked(),
        style(&host).cyan()
    );
    Ok(())
}

fn logout(args: &LogoutArgs, global: &GlobalOptions) -> Result<()> {
    let host = match &args.host {
        Some(h) => normalize_host(h),
        None => resolve_host(&Config::load()?, global)?,
    };

    let keyring = KeyringStore::new();
    keyring.delete_api_key(&host)?;
    keyring.delete_sso_secret(&host)?;

    println!("{} Logged out of {}", style("✓").green(), style(&host).cyan());
    Ok(())
}

async fn status(global: &GlobalOptions) -> Result<()> {
    let config = Config::load()?;
    let keyring = KeyringStore::new();

    let mut hosts: Vec<&String> = config.hosts.keys().collect();
    hosts.sort();
    if hosts.is_empty() {
        println!("Not logged in to any forum. Run 'discourse auth login'.");
        return Ok(());
    }

    for host in hosts {
        let key = keyring.api_key(host)?;
        let sso = keyring.sso_secret(host)?.is_some();
        let marker = if config.core.default_host.as_deref() == Some(host.as_str()) {
            " (default)"
        } else {
            ""
        };

        println!("{}{}", style(host).bold(), marker);
        match key {
            Some(key) => println!("  API key: {}", ApiCredential::new(key).masked()),
            None => println!("  API key: {}", style("missing").red()),
        }
        println!("  SSO secret: {}", if sso { "stored" } else { "not set" });
    }

    // Check the active forum with a cheap authenticated call.
    if let Ok(client) = build_client(global) {
        let result = client.get("/session/current.json", FormFields::new()).await;
        println!("{}", session_status(&client.config().host, result));
    }
    Ok(())
}

/// Describes the outcome of the `/session/current.json` check.
fn session_status(host: &str, result: Result<ApiResponse, ApiError>) -> String {
    match result {
        Ok(response) if response.is_success() => {
            let username = response
                .pointer("/current_user/username")
                .and_then(|u| u.as_str())
                .unwrap_or("unknown");
            format!(
                "{} {} accepts the key (acting as {})",
                style("✓").green(),
                host,
                username
            )
        }
        Ok(response) => format!("{} {} answered {}", style("✗").red(), host, response.status),
        Err(e) => format!("{} {} check failed: {}", style("✗").red(), host, e),
    }
}

fn read_line_from_stdin() -> Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_status_reports_user() {
        let response =
            ApiResponse::from_body(200, r#"{"current_user":{"username":"system"}}"#);
        let line = session_status("forum.example.com", Ok(response));
        assert!(line.contains("accepts the key (acting as system)"));
    }

    #[test]
    fn test_session_status_reports_rejection_and_failure() {
        let rejected = session_status(
            "forum.example.com",
            Ok(ApiResponse::from_body(403, r#"{"errors":["invalid key"]}"#)),
        );
        assert!(rejected.contains("answered 403"));

        let failed = session_status(
            "forum.example.com",
            Err(ApiError::RateLimited { retry_after: None }),
        );
        assert!(failed.contains("forum.example.com check failed: Rate limit exceeded"));
    }
}
