//
//  discourse-api
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use discourse_api::api::ApiError;
use discourse_api::cli::{Cli, Commands};
use discourse_api::exit_codes;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.debug_requests);

    match run(cli).await {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_code(&e));
        }
    }
}

/// Initialize logging from `DISCOURSE_DEBUG` (e.g. `debug`, `discourse_api=info`)
///
/// `--debug-requests` raises the library to `info` so request traces reach stderr.
fn init_logging(debug_requests: bool) {
    let mut filter = EnvFilter::try_from_env("DISCOURSE_DEBUG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    if debug_requests {
        if let Ok(directive) = "discourse_api=info".parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Main command dispatcher
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Auth(cmd) => cmd.run(&cli.global).await,
        Commands::Api(cmd) => cmd.run(&cli.global).await,
        Commands::Sso(cmd) => cmd.run(&cli.global).await,
        Commands::Config(cmd) => cmd.run(&cli.global).await,
        Commands::Completion(cmd) => cmd.run(),
        Commands::Version => {
            println!("discourse version {}", discourse_api::VERSION);
            Ok(())
        }
    }
}

fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<ApiError>() {
        Some(ApiError::RateLimited { .. }) => exit_codes::RATE_LIMIT,
        Some(ApiError::Status { status: 401 | 403, .. }) => exit_codes::AUTH_ERROR,
        Some(ApiError::Status { status: 404, .. }) => exit_codes::NOT_FOUND,
        Some(ApiError::InvalidRequest(_)) => exit_codes::USAGE,
        _ => exit_codes::ERROR,
    }
}
