//
//  discourse-api
//  cli/api.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Direct API access command
//!
//! Sends one request through the client, so it gets the same headers,
//! parameter encoding and `show_emails=true` injection as the library.
//!
//! ## Examples
//!
//! ```bash
//! # List categories
//! discourse api /categories.json
//!
//! # Reply to a topic as alice
//! discourse api -X POST /posts -F raw="Hello there" -F topic_id=42 --as alice
//!
//! # Create a group (sent as group[name]=...&group[usernames]=...)
//! discourse api -X POST /admin/groups --nested -F name=beta -F usernames=a,b
//!
//! # Upload an image
//! discourse api -X POST /uploads.json --upload ./logo.png --mime image/png
//! ```

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use console::style;

use crate::api::{
    ApiRequest, ApiResponse, ContentTypePolicy, FileUpload, FormFields, NestedForm, Params,
    Payload, Verb,
};

use super::{build_client, parse_field, GlobalOptions};

const DEFAULT_UPLOAD_MIME: &str = "application/octet-stream";

/// Make direct API requests
#[derive(Args, Debug)]
pub struct ApiCommand {
    /// API path including the .json suffix (e.g. /categories.json)
    pub path: String,

    /// HTTP method (GET, PUT, POST, DELETE)
    #[arg(long, short = 'X', default_value = "GET")]
    pub method: String,

    /// Parameters as key=value (can be specified multiple times)
    #[arg(long, short = 'F', action = clap::ArgAction::Append)]
    pub field: Vec<String>,

    /// Send the fields nested under ROOT, as ROOT[key]=value (--nested=ROOT)
    #[arg(
        long,
        value_name = "ROOT",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "group"
    )]
    pub nested: Option<String>,

    /// Act as this user instead of the configured default
    #[arg(long = "as", value_name = "USER")]
    pub acting_user: Option<String>,

    /// Upload a file as multipart form data
    #[arg(long, value_name = "FILE", conflicts_with = "nested")]
    pub upload: Option<PathBuf>,

    /// File name to send with --upload (defaults to the file's name)
    #[arg(long, requires = "upload")]
    pub filename: Option<String>,

    /// MIME type of the --upload file [default: application/octet-stream]
    #[arg(long, requires = "upload")]
    pub mime: Option<String>,

    /// Declare multipart/form-data on every write, as older clients did
    #[arg(long)]
    pub legacy_content_type: bool,

    /// Print the status line before the body
    #[arg(long, short = 'i')]
    pub include: bool,
}

impl ApiCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = build_client(global)?;
        let request = self.build_request()?;

        let response = client.execute(request).await?;
        print_response(&response, self.include, global.json)?;

        response.error_for_status()?;
        Ok(())
    }

    fn build_request(&self) -> Result<ApiRequest> {
        let verb: Verb = self.method.parse().map_err(anyhow::Error::msg)?;
        if !self.path.starts_with('/') {
            bail!("API path must start with '/': {}", self.path);
        }

        let fields = self
            .field
            .iter()
            .map(|f| parse_field(f))
            .collect::<Result<FormFields>>()?;

        let params = if let Some(path) = &self.upload {
            let filename = self.filename.clone().unwrap_or_else(|| {
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "upload".to_string())
            });
            let mime = self.mime.as_deref().unwrap_or(DEFAULT_UPLOAD_MIME);
            let mut upload = FileUpload::new(path, filename, mime);
            for (key, value) in fields.iter() {
                upload = upload.with_field(key, value);
            }
            Params::Upload(upload)
        } else if let Some(root) = &self.nested {
            Params::Nested(NestedForm::new(root, fields))
        } else {
            Params::from(fields)
        };

        let mut request = ApiRequest::new(verb, &self.path).params(params);
        if let Some(user) = &self.acting_user {
            request = request.as_user(user);
        }
        if self.legacy_content_type {
            request = request.content_type(ContentTypePolicy::Legacy);
        }
        Ok(request)
    }
}

/// Prints a response as pretty JSON, or verbatim text when the body was not JSON.
pub(crate) fn print_response(response: &ApiResponse, include: bool, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
        return Ok(());
    }

    if include {
        let status = if response.is_success() {
            style(response.status).green()
        } else {
            style(response.status).red()
        };
        println!("{} {}", style("HTTP").dim(), status);
        println!();
    }

    match &response.payload {
        Payload::Json(value) => println!("{}", serde_json::to_string_pretty(value)?),
        Payload::Text(text) => println!("{}", text),
    }
    Ok(())
}
