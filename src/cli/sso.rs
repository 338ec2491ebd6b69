//
//  discourse-api
//  cli/sso.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! DiscourseConnect (SSO) commands
//!
//! ```bash
//! # Create or update a user from the identity provider's record
//! discourse sso sync --email jo@example.com --username jo -F external_id=42
//!
//! # Show the signed payload without sending it
//! discourse sso sign --email jo@example.com --username jo -F add_groups=beta
//! ```

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::api::FormFields;
use crate::auth::{sign, sso, KeyringStore};
use crate::config::Config;

use super::api::print_response;
use super::{build_client, parse_field, resolve_host, GlobalOptions};

#[derive(Args, Debug)]
pub struct SsoCommand {
    #[command(subcommand)]
    pub command: SsoSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SsoSubcommand {
    /// Create or update a user through /admin/users/sync_sso
    Sync(SsoArgs),

    /// Print the signed sso and sig fields
    Sign(SsoArgs),
}

#[derive(Args, Debug)]
pub struct SsoArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub username: String,

    /// Extra SSO attributes as key=value (external_id, add_groups, ...)
    #[arg(long, short = 'F', action = clap::ArgAction::Append)]
    pub field: Vec<String>,
}

impl SsoArgs {
    fn extra(&self) -> Result<FormFields> {
        self.field.iter().map(|f| parse_field(f)).collect()
    }
}

impl SsoCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            SsoSubcommand::Sync(args) => {
                let client = build_client(global)?;
                let response = client
                    .sync_sso(&args.email, &args.username, &args.extra()?)
                    .await?;
                print_response(&response, false, global.json)?;
                response.error_for_status()?;
                Ok(())
            }
            SsoSubcommand::Sign(args) => {
                let host = resolve_host(&Config::load()?, global)?;
                let secret = KeyringStore::new()
                    .sso_secret(&host)?
                    .with_context(|| format!("No SSO secret stored for {}", host))?;

                let params = sso::sso_params(&args.email, &args.username, &args.extra()?);
                let payload = sign(&params, &secret);
                if global.json {
                    let value = serde_json::json!({ "sso": payload.sso, "sig": payload.sig });
                    println!("{}", serde_json::to_string_pretty(&value)?);
                } else {
                    println!("sso={}", payload.sso);
                    println!("sig={}", payload.sig);
                }
                Ok(())
            }
        }
    }
}
