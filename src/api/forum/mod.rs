//
//  discourse-api
//  api/forum/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Endpoint wrappers.
//!
//! Each method maps its arguments to a path and a [`Params`](crate::api::Params)
//! value and makes one call through [`DiscourseClient::execute`](crate::api::DiscourseClient::execute).
//! A few wrappers first look up an id (a group id from its name, a user id
//! from a username) and return `Ok(None)` when the lookup finds nothing.
//!
//! - [`groups`]: group listing, membership, creation and removal
//! - [`categories`]: category listing, creation and editing
//! - [`users`]: user lookup, provisioning, suspension, SSO sync
//! - [`posts`]: posts and topics
//! - [`site`]: site settings and uploads

pub mod categories;
pub mod groups;
pub mod posts;
pub mod site;
pub mod users;

pub use categories::CategoryUpdate;
pub use groups::NewGroup;
pub use posts::NewTopic;
pub use users::NewUser;

use chrono::{DateTime, SecondsFormat, TimeZone};

/// Formats a timestamp the way Discourse expects `created_at`
/// (`2004-02-12T15:19:21+00:00`).
pub(crate) fn iso8601<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Formats the date part only (`2004-02-12`), used by expiry fields.
pub(crate) fn date_only<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y-%m-%d").to_string()
}
