//
//  discourse-api
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the HTTP client for a Discourse forum's REST API.
//!
//! ## Architecture
//!
//! - [`client`]: the request executor (URL building, auth headers, body
//!   encoding, response normalization)
//! - [`common`]: parameter encodings, the response type and errors
//! - [`forum`]: endpoint wrappers (groups, categories, users, posts, site)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use discourse_api::api::{ClientConfig, DiscourseClient, Protocol};
//!
//! let client = DiscourseClient::new(
//!     ClientConfig::new("forum.example.com", "your-api-key")
//!         .with_protocol(Protocol::Https)
//!         .with_sso_secret("shared-secret"),
//! )
//! .expect("Failed to create client");
//! ```
//!
//! ## Error Handling
//!
//! Only transport failures and HTTP 429 are errors. Every other status,
//! 4xx and 5xx included, comes back as an [`ApiResponse`] whose `status`
//! the caller inspects, or turns into [`ApiError::Status`] with
//! [`ApiResponse::error_for_status`].

/// The request executor.
pub mod client;

/// Shared types: [`Params`] and its encodings, [`ApiResponse`], [`ApiError`].
pub mod common;

/// Endpoint wrappers implemented on [`DiscourseClient`].
pub mod forum;

pub use client::{
    ApiRequest, ClientConfig, ContentTypePolicy, DiscourseClient, Protocol, Verb,
    DEFAULT_USERNAME, FORCED_QUERY_PARAM,
};

pub use common::{
    ApiError, ApiResponse, FileUpload, FormFields, NestedForm, Params, Payload,
};
