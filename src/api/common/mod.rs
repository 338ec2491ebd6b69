//
//  discourse-api
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types
//!
//! This module provides the types shared by the request executor and every
//! endpoint wrapper: the error type, the normalized response, and the
//! request parameters.
//!
//! # Overview
//!
//! - [`ApiError`] - Failures the executor reports (rate limiting, transport)
//! - [`ApiResponse`] - Status code plus parsed payload of a completed call
//! - [`Payload`] - Either structured JSON or the verbatim response text
//! - [`Params`] - Request parameters tagged with their wire encoding
//!
//! # Status Policy
//!
//! Only HTTP 429 is turned into an error by the executor. Every other status,
//! including 4xx and 5xx, comes back as an [`ApiResponse`] whose `status`
//! the caller is expected to inspect:
//!
//! ```rust
//! use discourse_api::api::common::{ApiResponse, Payload};
//!
//! let response = ApiResponse::from_body(404, r#"{"errors":["not found"]}"#);
//! assert!(!response.is_success());
//! assert!(matches!(response.payload, Payload::Json(_)));
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

mod params;

pub use params::*;

/// Error type for Discourse API operations.
///
/// | Variant | Raised by |
/// |---------|-----------|
/// | `RateLimited` | executor, on HTTP 429 |
/// | `Transport` | executor, on connection/DNS/TLS/timeout failures |
/// | `Status` | [`ApiResponse::error_for_status`] only (opt-in) |
/// | `Upload` | executor, when an upload file cannot be read |
/// | `MissingSsoSecret` | SSO helpers without a configured secret |
/// | `InvalidRequest` | executor, for parameter shapes a verb cannot carry |
/// | `UnexpectedPayload` | wrappers that need a field the response lacks |
///
/// Neither the executor nor the wrappers retry anything; retry and backoff
/// policy belongs to the caller.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered 429 Too Many Requests.
    ///
    /// `retry_after` carries the `Retry-After` header in seconds, when the
    /// server sent one.
    #[error("Rate limit exceeded")]
    RateLimited {
        /// Seconds to wait before retrying, if advertised.
        retry_after: Option<u64>,
    },

    /// A network-level error occurred during the request.
    ///
    /// This covers connection failures, timeouts, DNS resolution errors,
    /// TLS failures and other transport-layer issues.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A non-success status, produced only by [`ApiResponse::error_for_status`].
    #[error("API error ({status}): {message}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The file of an upload request could not be read.
    #[error("Failed to read upload file {path}: {source}")]
    Upload {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An SSO call was made without an SSO secret.
    #[error("SSO secret is not configured")]
    MissingSsoSecret,

    /// The request cannot be expressed with the chosen verb and parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A successful response did not contain an expected field.
    #[error("Unexpected response payload: {0}")]
    UnexpectedPayload(String),
}

impl ApiError {
    /// Returns `true` for the 429 rate-limit signal.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::RateLimited { .. })
    }
}

/// The body of a response: parsed JSON when the text is valid JSON,
/// otherwise the text exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// The body parsed as JSON (object, array, string, number, ...).
    Json(Value),
    /// The body as text, because it was not valid JSON.
    ///
    /// Decoded with the response's declared charset (UTF-8 by default).
    /// Byte sequences that do not decode become U+FFFD.
    Text(String),
}

impl Payload {
    /// Parses `body`, falling back to the raw text.
    pub fn parse(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Payload::Json(value),
            Err(_) => Payload::Text(body.to_string()),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Json(_) => None,
            Payload::Text(text) => Some(text),
        }
    }
}

/// The normalized result of one API call.
///
/// Carries the HTTP status code and the payload. A response is returned for
/// every status except 429, so callers must check [`status`](Self::status)
/// or use [`error_for_status`](Self::error_for_status).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The parsed payload.
    pub payload: Payload,
}

impl ApiResponse {
    /// Builds a response from a status code and raw body text.
    pub fn from_body(status: u16, body: &str) -> Self {
        Self {
            status,
            payload: Payload::parse(body),
        }
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The JSON payload, if the body was JSON.
    pub fn json(&self) -> Option<&Value> {
        self.payload.as_json()
    }

    /// The raw text, if the body was not JSON.
    pub fn text(&self) -> Option<&str> {
        self.payload.as_text()
    }

    /// Looks up a value by JSON pointer, e.g. `/group/id`.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.json().and_then(|v| v.pointer(pointer))
    }

    /// Deserializes the JSON payload into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let value = self.json().ok_or_else(|| {
            ApiError::UnexpectedPayload("response body is not JSON".to_string())
        })?;
        serde_json::from_value(value.clone())
            .map_err(|e| ApiError::UnexpectedPayload(e.to_string()))
    }

    /// Turns a non-2xx response into [`ApiError::Status`].
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::Status {
                status: self.status,
                message: error_message(&self.payload),
            })
        }
    }
}

/// Extracts a readable message from a Discourse error body.
///
/// Discourse reports errors as:
/// ```json
/// {"errors": ["Human readable message"], "error_type": "invalid_parameters"}
/// ```
/// Some endpoints use `{"error": "..."}` or `{"message": "..."}` instead.
/// Non-JSON bodies are returned as-is.
pub fn error_message(payload: &Payload) -> String {
    let json = match payload {
        Payload::Json(json) => json,
        Payload::Text(text) => return text.clone(),
    };

    // {"errors": ["...", "..."]}
    if let Some(errors) = json.get("errors").and_then(|e| e.as_array()) {
        let messages: Vec<&str> = errors.iter().filter_map(|m| m.as_str()).collect();
        if !messages.is_empty() {
            return messages.join("; ");
        }
    }

    // {"error": "..."}
    if let Some(message) = json.get("error").and_then(|m| m.as_str()) {
        return message.to_string();
    }

    if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
        return message.to_string();
    }

    json.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_body_is_parsed() {
        let response = ApiResponse::from_body(200, r#"{"id": 5, "name": "general"}"#);
        assert_eq!(response.status, 200);
        assert_eq!(
            response.payload,
            Payload::Json(json!({"id": 5, "name": "general"}))
        );
        assert_eq!(response.pointer("/id"), Some(&json!(5)));
    }

    #[test]
    fn test_non_json_body_is_kept_verbatim() {
        let response = ApiResponse::from_body(200, "OK");
        assert_eq!(response.payload, Payload::Text("OK".to_string()));

        let response = ApiResponse::from_body(502, "");
        assert_eq!(response.text(), Some(""));
    }

    #[test]
    fn test_error_for_status_extracts_discourse_errors() {
        let response = ApiResponse::from_body(
            422,
            r#"{"errors":["Name has already been taken"],"error_type":"invalid_parameters"}"#,
        );
        match response.error_for_status() {
            Err(ApiError::Status { status, message }) => {
                assert_eq!(status, 422);
                assert_eq!(message, "Name has already been taken");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_error_for_status_passes_success_through() {
        let response = ApiResponse::from_body(204, "");
        assert!(response.clone().error_for_status().is_ok());
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(
            error_message(&Payload::parse(r#"{"error":"not found"}"#)),
            "not found"
        );
        assert_eq!(error_message(&Payload::parse("Bad Gateway")), "Bad Gateway");
    }

    #[test]
    fn test_deserialize_payload() {
        #[derive(serde::Deserialize)]
        struct Category {
            id: u64,
            name: String,
        }

        let response = ApiResponse::from_body(200, r#"{"id": 5, "name": "general"}"#);
        let category: Category = response.deserialize().unwrap();
        assert_eq!(category.id, 5);
        assert_eq!(category.name, "general");

        let text = ApiResponse::from_body(200, "OK");
        assert!(text.deserialize::<Category>().is_err());
    }
}
