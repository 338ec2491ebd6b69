//
//  discourse-api
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Discourse API Client
//!
//! A client for the REST API of a Discourse forum, plus the `discourse`
//! command-line tool built on it.
//!
//! ## Overview
//!
//! Every call goes through one request executor that:
//!
//! - builds `{protocol}://{host}{path}`
//! - attaches the `Api-Key` and `Api-Username` headers
//! - sends GET parameters in the query string, always with `show_emails=true`
//! - encodes write bodies as urlencoded forms, nested `group[...]` forms or
//!   multipart file uploads
//! - returns the status code with the body parsed as JSON, or the raw text
//!   when the body is not JSON
//!
//! HTTP 429 is the only status the executor turns into an error
//! ([`ApiError::RateLimited`](api::ApiError::RateLimited)). Nothing is
//! retried.
//!
//! ## Module Structure
//!
//! - [`api`]: the executor, parameter and response types, endpoint wrappers
//! - [`auth`]: API key headers, SSO signing, keyring storage
//! - [`config`]: configuration file of the `discourse` binary
//! - [`cli`]: command-line interface definitions using clap
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use discourse_api::api::{ClientConfig, DiscourseClient};
//!
//! # async fn example() -> Result<(), discourse_api::api::ApiError> {
//! let client = DiscourseClient::new(ClientConfig::new("forum.example.com", "api-key"))?;
//!
//! if let Some(response) = client.join_group("beta-testers", "alice").await? {
//!     println!("join answered {}", response.status);
//! }
//!
//! let user = client.get_user_by_email("alice@example.com").await?;
//! println!("{:?}", user);
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions.
pub mod cli;

/// The Discourse API client.
///
/// The executor lives in [`api::client`]; the endpoint wrappers in
/// [`api::forum`] are inherent methods of [`api::DiscourseClient`].
pub mod api;

/// Credentials: API key headers, SSO payload signing and keyring storage.
pub mod auth;

/// Configuration file management.
///
/// Stored in platform-specific locations:
/// - Linux: `~/.config/discourse/config.toml`
/// - macOS: `~/Library/Application Support/discourse/config.toml`
/// - Windows: `%APPDATA%\discourse\config.toml`
pub mod config;

pub use api::{ApiError, ApiResponse, ClientConfig, DiscourseClient};
pub use cli::Cli;
pub use config::Config;

/// Application name: the binary name and the config directory name.
pub const APP_NAME: &str = "discourse";

/// Crate version, taken from Cargo.toml at compile time.
///
/// ```rust
/// use discourse_api::VERSION;
///
/// println!("discourse version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// # Exit Code Ranges
///
/// - `0`: Success
/// - `1-3`: General errors and usage issues
/// - `4-7`: Authentication-related issues
/// - `8-15`: Resource-related issues
/// - `32+`: External service issues
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error. Check stderr for details.
    pub const ERROR: i32 = 1;

    /// Invalid usage or arguments.
    pub const USAGE: i32 = 2;

    /// The forum rejected the API key or acting user (401/403), or no key
    /// is stored. Run `discourse auth login`.
    pub const AUTH_ERROR: i32 = 4;

    /// The forum answered 404.
    pub const NOT_FOUND: i32 = 8;

    /// The forum answered 429. Wait before retrying.
    pub const RATE_LIMIT: i32 = 32;
}
