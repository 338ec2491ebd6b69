//
//  discourse-api
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client Wrapper for the Discourse API
//!
//! This module provides the request executor every endpoint goes through.
//! One call is exactly one HTTP round trip:
//!
//! 1. The URL is `{protocol}://{host}{path}`.
//! 2. `Api-Key` and `Api-Username` headers are attached.
//! 3. GET parameters go to the query string together with the forced
//!    `show_emails=true`; write parameters are encoded per [`Params`].
//! 4. The body is parsed as JSON when possible, otherwise kept as text.
//! 5. HTTP 429 becomes [`ApiError::RateLimited`]; every other status is
//!    returned in the [`ApiResponse`] for the caller to inspect.
//!
//! Nothing is retried, neither rate-limited calls nor transport failures.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, RETRY_AFTER};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::api::common::{build_query, ApiError, ApiResponse, FileUpload, FormFields, Params};
use crate::auth::ApiCredential;

/// The identity requests act as when no username is given.
pub const DEFAULT_USERNAME: &str = "system";

/// The query parameter added to every GET request.
///
/// Without it Discourse redacts email addresses from user records.
pub const FORCED_QUERY_PARAM: (&str, &str) = ("show_emails", "true");

/// Content type of urlencoded write bodies.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Content type the legacy policy declares on every write.
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// URL scheme of the forum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    #[default]
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            other => Err(format!("Unsupported protocol: {}", other)),
        }
    }
}

/// The HTTP verbs the Discourse API is called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Put,
    Post,
    Delete,
}

impl Verb {
    pub fn method(&self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Put => Method::PUT,
            Verb::Post => Method::POST,
            Verb::Delete => Method::DELETE,
        }
    }

    /// PUT, POST and DELETE carry a body; GET does not.
    pub fn is_write(&self) -> bool {
        !matches!(self, Verb::Get)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method().as_str())
    }
}

impl FromStr for Verb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Verb::Get),
            "PUT" => Ok(Verb::Put),
            "POST" => Ok(Verb::Post),
            "DELETE" => Ok(Verb::Delete),
            _ => Err(format!("Unsupported HTTP method: {}", s)),
        }
    }
}

/// Which `Content-Type` header write requests declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentTypePolicy {
    /// Declare the encoding actually used: urlencoded for form bodies,
    /// multipart with its boundary for uploads.
    #[default]
    MatchBody,
    /// Declare `multipart/form-data` on every non-upload write, whatever the
    /// body encoding. Matches older deployments byte for byte.
    Legacy,
}

impl ContentTypePolicy {
    fn form_header(&self) -> &'static str {
        match self {
            ContentTypePolicy::MatchBody => FORM_URLENCODED,
            ContentTypePolicy::Legacy => MULTIPART_FORM_DATA,
        }
    }
}

/// Settings of one forum installation.
///
/// Only the SSO secret may change after the client is built, through
/// [`DiscourseClient::set_sso_secret`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host name, optionally with a port (`forum.example.com`, `127.0.0.1:8080`).
    pub host: String,
    pub protocol: Protocol,
    pub credential: ApiCredential,
    /// Shared secret for SSO payload signatures.
    pub sso_secret: Option<String>,
    /// Acting user for requests that do not name one.
    pub default_username: String,
    /// Pairs appended to every GET query string.
    pub forced_query: Vec<(String, String)>,
    pub content_type: ContentTypePolicy,
    /// Request timeout; `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Creates a configuration with the standard defaults: HTTPS, acting as
    /// `system`, `show_emails=true` on reads, matching content types.
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            protocol: Protocol::default(),
            credential: ApiCredential::new(api_key),
            sso_secret: None,
            default_username: DEFAULT_USERNAME.to_string(),
            forced_query: vec![(
                FORCED_QUERY_PARAM.0.to_string(),
                FORCED_QUERY_PARAM.1.to_string(),
            )],
            content_type: ContentTypePolicy::default(),
            timeout: None,
        }
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_sso_secret(mut self, secret: impl Into<String>) -> Self {
        self.sso_secret = Some(secret.into());
        self
    }

    pub fn with_default_username(mut self, username: impl Into<String>) -> Self {
        self.default_username = username.into();
        self
    }

    pub fn with_forced_query(mut self, forced: Vec<(String, String)>) -> Self {
        self.forced_query = forced;
        self
    }

    pub fn with_content_type(mut self, policy: ContentTypePolicy) -> Self {
        self.content_type = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// One request: verb, path, parameters, and optionally who it acts as.
///
/// # Example
///
/// ```rust
/// use discourse_api::api::{ApiRequest, FormFields};
///
/// let request = ApiRequest::post("/posts")
///     .params(FormFields::new().with("raw", "Hello").with("topic_id", 42))
///     .as_user("alice");
/// assert_eq!(request.username.as_deref(), Some("alice"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub verb: Verb,
    /// Server-relative path including any `.json` suffix.
    pub path: String,
    pub params: Params,
    /// Acting user; the client's default when `None`.
    pub username: Option<String>,
    /// Overrides the client's content-type policy for this request.
    pub content_type: Option<ContentTypePolicy>,
}

impl ApiRequest {
    pub fn new(verb: Verb, path: impl Into<String>) -> Self {
        Self {
            verb,
            path: path.into(),
            params: Params::None,
            username: None,
            content_type: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Verb::Get, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Verb::Put, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Verb::Post, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Verb::Delete, path)
    }

    pub fn params(mut self, params: impl Into<Params>) -> Self {
        self.params = params.into();
        self
    }

    pub fn as_user(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn content_type(mut self, policy: ContentTypePolicy) -> Self {
        self.content_type = Some(policy);
        self
    }
}

/// The client for one Discourse installation.
///
/// Cheap to share behind an `Arc`: calls borrow `&self` and keep no
/// per-call state. The two debug flags are atomics and may be toggled while
/// requests are in flight.
///
/// # Example
///
/// ```rust,no_run
/// use discourse_api::api::{ClientConfig, DiscourseClient, FormFields};
///
/// # async fn example() -> Result<(), discourse_api::api::ApiError> {
/// let client = DiscourseClient::new(ClientConfig::new("forum.example.com", "api-key"))?;
///
/// let response = client.get("/categories.json", FormFields::new()).await?;
/// if response.is_success() {
///     println!("{:?}", response.pointer("/category_list/categories/0/name"));
/// }
/// # Ok(())
/// # }
/// ```
pub struct DiscourseClient {
    http: Client,
    config: ClientConfig,
    debug_get: AtomicBool,
    debug_write: AtomicBool,
}

impl fmt::Debug for DiscourseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscourseClient")
            .field("config", &self.config)
            .field("debug_get", &self.is_debug_get_requests())
            .field("debug_write", &self.is_debug_write_requests())
            .finish()
    }
}

impl DiscourseClient {
    /// Builds the client and its underlying HTTP connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be created
    /// (for example, when the TLS backend fails to initialize).
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder().user_agent(format!("discourse-api/{}", crate::VERSION));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            config,
            debug_get: AtomicBool::new(false),
            debug_write: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns `{protocol}://{host}`.
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.config.protocol, self.config.host)
    }

    /// Returns the absolute URL of `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    pub fn sso_secret(&self) -> Option<&str> {
        self.config.sso_secret.as_deref()
    }

    /// Sets the SSO secret after construction.
    pub fn set_sso_secret(&mut self, secret: impl Into<String>) {
        self.config.sso_secret = Some(secret.into());
    }

    pub fn is_debug_get_requests(&self) -> bool {
        self.debug_get.load(Ordering::Relaxed)
    }

    /// Traces GET requests with their parameters at `info` level.
    pub fn set_debug_get_requests(&self, enabled: bool) {
        self.debug_get.store(enabled, Ordering::Relaxed);
    }

    pub fn is_debug_write_requests(&self) -> bool {
        self.debug_write.load(Ordering::Relaxed)
    }

    /// Traces PUT, POST and DELETE requests with their bodies at `info` level.
    pub fn set_debug_write_requests(&self, enabled: bool) {
        self.debug_write.store(enabled, Ordering::Relaxed);
    }

    /// Makes a GET request acting as the default user.
    pub async fn get(&self, path: &str, query: FormFields) -> Result<ApiResponse, ApiError> {
        self.execute(ApiRequest::get(path).params(query)).await
    }

    /// Makes a PUT request acting as the default user.
    pub async fn put(&self, path: &str, params: impl Into<Params>) -> Result<ApiResponse, ApiError> {
        self.execute(ApiRequest::put(path).params(params)).await
    }

    /// Makes a POST request acting as the default user.
    pub async fn post(&self, path: &str, params: impl Into<Params>) -> Result<ApiResponse, ApiError> {
        self.execute(ApiRequest::post(path).params(params)).await
    }

    /// Makes a DELETE request acting as the default user.
    pub async fn delete(&self, path: &str, params: impl Into<Params>) -> Result<ApiResponse, ApiError> {
        self.execute(ApiRequest::delete(path).params(params)).await
    }

    /// Performs one request and normalizes the response.
    ///
    /// # Errors
    ///
    /// - [`ApiError::RateLimited`] when the server answers 429
    /// - [`ApiError::Transport`] when the request cannot be completed
    /// - [`ApiError::Upload`] when an upload file cannot be read
    /// - [`ApiError::InvalidRequest`] for an upload sent with GET, or an
    ///   invalid upload MIME type
    ///
    /// Any other status, 4xx and 5xx included, is returned as `Ok`.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let username = request
            .username
            .as_deref()
            .unwrap_or(&self.config.default_username);
        let policy = request.content_type.unwrap_or(self.config.content_type);

        let builder = if request.verb.is_write() {
            self.write_request(&request, username, policy).await?
        } else {
            self.read_request(&request, username)?
        };

        let response = builder.send().await?;
        read_response(response).await
    }

    fn read_request(&self, request: &ApiRequest, username: &str) -> Result<RequestBuilder, ApiError> {
        let fields = request.params.query_fields().ok_or_else(|| {
            ApiError::InvalidRequest(format!(
                "GET {} cannot carry a file upload",
                request.path
            ))
        })?;
        let query = build_query(&fields, &self.config.forced_query);

        let mut url = self.url(&request.path);
        if !query.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&query);
        }

        self.trace(request, username, self.is_debug_get_requests(), &query);

        let builder = self.http.request(Method::GET, &url);
        Ok(self.config.credential.apply_to_request(builder, username))
    }

    async fn write_request(
        &self,
        request: &ApiRequest,
        username: &str,
        policy: ContentTypePolicy,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.url(&request.path);
        self.trace(
            request,
            username,
            self.is_debug_write_requests(),
            &request.params.to_string(),
        );

        let builder = self.http.request(request.verb.method(), &url);
        let builder = self.config.credential.apply_to_request(builder, username);

        let builder = match &request.params {
            Params::None => builder
                .header(CONTENT_TYPE, policy.form_header())
                .body(String::new()),
            Params::Form(fields) => builder
                .header(CONTENT_TYPE, policy.form_header())
                .body(fields.encode()),
            Params::Nested(nested) => builder
                .header(CONTENT_TYPE, policy.form_header())
                .body(nested.encode()),
            // reqwest sets multipart/form-data with the boundary itself
            Params::Upload(upload) => builder.multipart(upload_form(upload).await?),
        };

        Ok(builder)
    }

    fn trace(&self, request: &ApiRequest, username: &str, verbose: bool, params: &str) {
        tracing::debug!(
            method = %request.verb,
            path = %request.path,
            user = %username,
            "Discourse API request"
        );
        if verbose {
            tracing::info!(
                method = %request.verb,
                path = %request.path,
                user = %username,
                kind = request.params.kind(),
                params = %params,
                "Discourse API request"
            );
        }
    }
}

/// Builds the multipart form of an upload: the file part first, then the
/// text fields (`type=upload` and any extras).
async fn upload_form(upload: &FileUpload) -> Result<Form, ApiError> {
    let bytes = tokio::fs::read(&upload.path)
        .await
        .map_err(|source| ApiError::Upload {
            path: upload.path.display().to_string(),
            source,
        })?;

    let part = Part::bytes(bytes)
        .file_name(upload.filename.clone())
        .mime_str(&upload.mime)
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid MIME type '{}': {}", upload.mime, e)))?;

    let mut form = Form::new().part(FileUpload::FILE_FIELD, part);
    for (key, value) in upload.extra.iter() {
        form = form.text(key.to_string(), value.to_string());
    }
    Ok(form)
}

/// Reads status and body; 429 becomes [`ApiError::RateLimited`].
///
/// The body is decoded lossily, so invalid bytes turn into U+FFFD.
async fn read_response(response: Response) -> Result<ApiResponse, ApiError> {
    let status = response.status();
    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    let body = response.text().await?;

    if status == StatusCode::TOO_MANY_REQUESTS {
        tracing::warn!(?retry_after, "Discourse API rate limit hit");
        return Err(ApiError::RateLimited { retry_after });
    }

    tracing::debug!(status = status.as_u16(), bytes = body.len(), "Discourse API response");
    Ok(ApiResponse::from_body(status.as_u16(), &body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_parsing() {
        assert_eq!("get".parse::<Verb>().unwrap(), Verb::Get);
        assert_eq!("DELETE".parse::<Verb>().unwrap(), Verb::Delete);
        assert!("PATCH".parse::<Verb>().is_err());
        assert!(!Verb::Get.is_write());
        assert!(Verb::Put.is_write());
    }

    #[test]
    fn test_protocol_parsing() {
        assert_eq!("HTTP".parse::<Protocol>().unwrap(), Protocol::Http);
        assert_eq!(Protocol::default(), Protocol::Https);
        assert!("ftp".parse::<Protocol>().is_err());
    }

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::new("forum.example.com", "key");
        assert_eq!(config.default_username, "system");
        assert_eq!(
            config.forced_query,
            vec![("show_emails".to_string(), "true".to_string())]
        );
        assert_eq!(config.content_type, ContentTypePolicy::MatchBody);
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_urls() {
        let client = DiscourseClient::new(
            ClientConfig::new("forum.example.com", "key").with_protocol(Protocol::Http),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://forum.example.com");
        assert_eq!(
            client.url("/categories.json"),
            "http://forum.example.com/categories.json"
        );
    }

    #[test]
    fn test_debug_flags_are_independent() {
        let client = DiscourseClient::new(ClientConfig::new("forum.example.com", "key")).unwrap();
        client.set_debug_write_requests(true);
        assert!(client.is_debug_write_requests());
        assert!(!client.is_debug_get_requests());
    }

    #[test]
    fn test_sso_secret_can_be_set_later() {
        let mut client = DiscourseClient::new(ClientConfig::new("forum.example.com", "key")).unwrap();
        assert!(client.sso_secret().is_none());
        client.set_sso_secret("s3cr3t");
        assert_eq!(client.sso_secret(), Some("s3cr3t"));
    }
}
