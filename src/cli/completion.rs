//
//  discourse-api
//  cli/completion.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Shell completion commands

use anyhow::Result;
use clap::{Args, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use super::Cli;

#[derive(Args, Debug)]
pub struct CompletionCommand {
    #[command(subcommand)]
    pub command: CompletionSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CompletionSubcommand {
    Bash,

    Zsh,

    Fish,

    Powershell,
}

impl CompletionCommand {
    pub fn run(&self) -> Result<()> {
        let shell = match self.command {
            CompletionSubcommand::Bash => Shell::Bash,
            CompletionSubcommand::Zsh => Shell::Zsh,
            CompletionSubcommand::Fish => Shell::Fish,
            CompletionSubcommand::Powershell => Shell::PowerShell,
        };

        let mut cmd = Cli::command();
        generate(shell, &mut cmd, crate::APP_NAME, &mut std::io::stdout());
        Ok(())
    }
}
