//
//  discourse-api
//  auth/sso.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # DiscourseConnect (SSO) Signing
//!
//! Discourse provisions single-sign-on users from a signed payload:
//!
//! 1. The user attributes are encoded as a query string
//!    (`email=...&username=...&external_id=...`).
//! 2. The query string is base64-encoded; this is the `sso` field.
//! 3. `sig` is the lowercase hex HMAC-SHA256 of the `sso` field, keyed with
//!    the SSO secret shared with the forum.
//!
//! Only signing lives here. Verifying signatures is the forum's job.
//!
//! ## Example
//!
//! ```rust
//! use discourse_api::api::common::FormFields;
//! use discourse_api::auth::sso;
//!
//! let params = FormFields::new()
//!     .with("email", "jo@example.com")
//!     .with("username", "jo");
//! let payload = sso::sign(&params, "s3cr3t");
//! assert_eq!(payload.sig.len(), 64);
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::api::common::FormFields;

type HmacSha256 = Hmac<Sha256>;

/// A signed SSO payload, ready to be posted as the `sso` and `sig` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsoPayload {
    /// Base64 of the urlencoded parameters.
    pub sso: String,
    /// Hex HMAC-SHA256 of `sso`.
    pub sig: String,
}

impl SsoPayload {
    /// The form fields posted to `/admin/users/sync_sso`.
    pub fn to_fields(&self) -> FormFields {
        FormFields::new()
            .with("sso", &self.sso)
            .with("sig", &self.sig)
    }
}

/// Builds the SSO parameter list: `email`, `username`, then `extra` in order.
///
/// Extra keys such as `external_id`, `add_groups` or `require_activation`
/// may override `email`/`username` if they repeat them.
pub fn sso_params(email: &str, username: &str, extra: &FormFields) -> FormFields {
    let mut params = FormFields::new()
        .with("email", email)
        .with("username", username);
    params.extend(extra.clone());
    params
}

/// Encodes and signs `params` with `secret`.
pub fn sign(params: &FormFields, secret: &str) -> SsoPayload {
    let sso = STANDARD.encode(params.to_query_string());
    let sig = signature(&sso, secret);
    SsoPayload { sso, sig }
}

/// Hex HMAC-SHA256 of `payload` keyed with `secret`.
pub fn signature(payload: &str, secret: &str) -> String {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
