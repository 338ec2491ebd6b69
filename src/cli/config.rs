//
//  discourse-api
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI configuration commands
//!
//! Core keys apply globally; `--host` addresses the per-forum keys.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use crate::config::{Config, HOST_KEYS};

use super::GlobalOptions;

const VALID_CORE_KEYS: &[&str] = &["default_host"];

#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print a configuration value
    Get(GetArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// List all configuration values
    #[command(visible_alias = "ls")]
    List,

    /// Print the configuration file path
    Path,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    pub key: String,

    #[arg(long, short = 'H')]
    pub host: Option<String>,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    pub key: String,

    pub value: String,

    #[arg(long, short = 'H')]
    pub host: Option<String>,
}

impl ConfigCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Get(args) => get(args, global),
            ConfigSubcommand::Set(args) => set(args, global),
            ConfigSubcommand::List => list(global),
            ConfigSubcommand::Path => {
                println!("{}", Config::config_path()?.display());
                Ok(())
            }
        }
    }
}

fn get(args: &GetArgs, global: &GlobalOptions) -> Result<()> {
    let config = Config::load()?;
    let value = match &args.host {
        Some(host) => config.get_host(host, &args.key),
        None => config.get(&args.key),
    };

    if global.json {
        let result = serde_json::json!({
            "key": args.key,
            "value": value,
            "host": args.host,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if let Some(v) = value {
        println!("{}", v);
    }
    Ok(())
}

fn set(args: &SetArgs, global: &GlobalOptions) -> Result<()> {
    let mut config = Config::load()?;

    match &args.host {
        Some(host) => config.set_host(host, &args.key, &args.value)?,
        None => {
            if !config.set(&args.key, args.value.clone()) {
                bail!(
                    "Unknown configuration key '{}'. Valid keys: {} (or with --host: {})",
                    args.key,
                    VALID_CORE_KEYS.join(", "),
                    HOST_KEYS.join(", ")
                );
            }
        }
    }
    config.save()?;

    if global.json {
        let result = serde_json::json!({
            "success": true,
            "key": args.key,
            "value": args.value,
            "host": args.host,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "{} Set {} = {}",
            style("✓").green(),
            style(&args.key).cyan(),
            args.value
        );
    }
    Ok(())
}

fn list(global: &GlobalOptions) -> Result<()> {
    let config = Config::load()?;

    if global.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    for key in VALID_CORE_KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", style(key).cyan(), value);
        }
    }

    let mut hosts: Vec<&String> = config.hosts.keys().collect();
    hosts.sort();
    for host in hosts {
        println!();
        println!("{}", style(format!("[{}]", host)).bold());
        for key in HOST_KEYS {
            if let Some(value) = config.get_host(host, key) {
                println!("{} = {}", style(key).cyan(), value);
            }
        }
    }
    Ok(())
}
