//
//  discourse-api
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Discourse authenticates API calls with two headers: `Api-Key`, the key
//! generated in the admin panel, and `Api-Username`, the identity the call
//! acts as. An all-users key may act as anyone, so the username is chosen
//! per request and defaults to the reserved `system` account.
//!
//! ## Module Structure
//!
//! - [`keyring`]: API key and SSO secret storage in the system keyring
//! - [`sso`]: DiscourseConnect payload encoding and HMAC-SHA256 signing
//!
//! ## Example
//!
//! ```rust
//! use discourse_api::auth::ApiCredential;
//!
//! let credential = ApiCredential::new("0123456789abcdef");
//! let client = reqwest::Client::new();
//! let request = credential.apply_to_request(client.get("https://forum.example.com/latest.json"), "system");
//! ```

mod keyring;
pub mod sso;

pub use keyring::*;
pub use sso::{sign, SsoPayload};

use std::fmt;

use reqwest::RequestBuilder;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "Api-Key";

/// Header carrying the acting username.
pub const API_USERNAME_HEADER: &str = "Api-Username";

/// An API key issued by a Discourse installation.
///
/// The key is never printed by `Debug`; use [`masked`](Self::masked) to
/// show it to a user.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredential {
    api_key: String,
}

impl ApiCredential {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Returns the raw key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Adds the `Api-Key` and `Api-Username` headers to a request.
    ///
    /// # Parameters
    ///
    /// - `request`: The [`RequestBuilder`] to authenticate.
    /// - `username`: The acting user for this call.
    pub fn apply_to_request(&self, request: RequestBuilder, username: &str) -> RequestBuilder {
        request
            .header(API_KEY_HEADER, &self.api_key)
            .header(API_USERNAME_HEADER, username)
    }

    /// Returns the key with everything but the last four characters hidden.
    ///
    /// ```rust
    /// use discourse_api::auth::ApiCredential;
    ///
    /// assert_eq!(ApiCredential::new("abcdef123456").masked(), "********3456");
    /// assert_eq!(ApiCredential::new("abc").masked(), "***");
    /// ```
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), visible)
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("api_key", &self.masked())
            .finish()
    }
}

/// Checks that a key has a plausible format: non-empty, no whitespace.
///
/// This does not contact the server.
pub fn validate_api_key(key: &str) -> bool {
    !key.is_empty() && !key.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_key() {
        let credential = ApiCredential::new("supersecretkey1234");
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("supersecret"));
        assert!(debug.contains("1234"));
    }

    #[test]
    fn test_validate_api_key() {
        assert!(validate_api_key("f1e2d3c4b5a6"));
        assert!(!validate_api_key(""));
        assert!(!validate_api_key("has space"));
    }

    #[test]
    fn test_apply_to_request_sets_both_headers() {
        let client = reqwest::Client::new();
        let request = ApiCredential::new("key-1")
            .apply_to_request(client.get("http://localhost/x.json"), "alice")
            .build()
            .unwrap();
        assert_eq!(request.headers()[API_KEY_HEADER], "key-1");
        assert_eq!(request.headers()[API_USERNAME_HEADER], "alice");
    }
}
