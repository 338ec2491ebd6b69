//
//  discourse-api
//  config/hosts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Host Utilities
//!
//! Hosts are stored bare (`forum.example.com`, `localhost:3000`). A scheme
//! typed by the user is stripped from the key and kept as the host's
//! [`Protocol`].
//!
//! ```rust
//! use discourse_api::api::Protocol;
//! use discourse_api::config::{normalize_host, split_protocol};
//!
//! assert_eq!(normalize_host("https://Forum.Example.com/"), "forum.example.com");
//! assert_eq!(
//!     split_protocol("http://localhost:3000"),
//!     (Some(Protocol::Http), "localhost:3000".to_string())
//! );
//! ```

use crate::api::Protocol;

/// Lowercases `host` and strips any scheme and trailing slash.
pub fn normalize_host(host: &str) -> String {
    split_protocol(host).1
}

/// Splits an optional `http://` or `https://` prefix off `host`.
pub fn split_protocol(host: &str) -> (Option<Protocol>, String) {
    let host = host.trim();
    let (protocol, rest) = if let Some(rest) = strip_prefix_ignore_case(host, "https://") {
        (Some(Protocol::Https), rest)
    } else if let Some(rest) = strip_prefix_ignore_case(host, "http://") {
        (Some(Protocol::Http), rest)
    } else {
        (None, host)
    };
    let rest = rest.trim_end_matches('/');
    (protocol, rest.to_lowercase())
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        s.get(prefix.len()..)
    } else {
        None
    }
}
