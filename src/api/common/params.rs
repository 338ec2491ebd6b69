//
//  discourse-api
//  api/common/params.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Request parameters and their wire encodings.
//!
//! Discourse endpoints accept three parameter shapes, and the shape decides
//! how a write request body is encoded. Instead of inspecting a loose map at
//! runtime, callers pick the shape up front with a [`Params`] variant:
//!
//! | Variant | Body | Used by |
//! |---------|------|---------|
//! | [`Params::Form`] | `k=urlencode(v)&...` (keys raw) | almost every endpoint |
//! | [`Params::Nested`] | `group%5Bname%5D=...` (`http_build_query`) | group create/edit |
//! | [`Params::Upload`] | multipart with a `file` part and `type=upload` | `/uploads.json` |
//!
//! All encodings are deterministic: fields are emitted in insertion order.

use std::fmt;
use std::path::PathBuf;

use url::form_urlencoded;

/// An ordered list of form fields.
///
/// Keys are kept in insertion order so the encoded output is byte-identical
/// across calls. Inserting an existing key replaces its value in place.
///
/// # Example
///
/// ```rust
/// use discourse_api::api::common::FormFields;
///
/// let fields = FormFields::new()
///     .with("name", "General Chat")
///     .with("color", "0E76BD");
///
/// assert_eq!(fields.encode(), "name=General+Chat&color=0E76BD");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    fields: Vec<(String, String)>,
}

impl FormFields {
    /// Creates an empty field list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field and returns `self` for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds a field, replacing the value of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Appends every field of `other`, replacing values of shared keys.
    pub fn extend(&mut self, other: FormFields) {
        for (k, v) in other.fields {
            self.insert(k, v);
        }
    }

    /// Encodes the fields as a write-request body.
    ///
    /// Each value is form-urlencoded (spaces become `+`), while keys are sent
    /// as-is. Discourse relies on raw keys for bracketed names such as
    /// `post[raw]` or `permissions[staff]`.
    pub fn encode(&self) -> String {
        self.fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, encode_component(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Encodes the fields as a query string, percent-encoding keys and values.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = FormFields::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

/// A form nested under a single top-level key, e.g. `group[name]=...`.
///
/// Encoded with `http_build_query` rules: the bracketed key and the value
/// are both percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedForm {
    /// The outer key (`group` for the group endpoints).
    pub root: String,
    /// The inner fields, emitted in insertion order.
    pub fields: FormFields,
}

impl NestedForm {
    pub fn new(root: impl Into<String>, fields: FormFields) -> Self {
        Self {
            root: root.into(),
            fields,
        }
    }

    /// Flattens the form into `root[key]` pairs.
    pub fn flatten(&self) -> FormFields {
        self.fields
            .iter()
            .map(|(k, v)| (format!("{}[{}]", self.root, k), v))
            .collect()
    }

    /// Encodes the flattened form, percent-encoding keys and values.
    pub fn encode(&self) -> String {
        self.flatten().to_query_string()
    }
}

/// A local file to send as a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Path of the file on disk; read when the request is sent.
    pub path: PathBuf,
    /// File name announced to the server.
    pub filename: String,
    /// Declared MIME type, e.g. `image/jpeg`.
    pub mime: String,
    /// Extra text fields sent alongside the file.
    pub extra: FormFields,
}

impl FileUpload {
    /// Field name of the file part.
    pub const FILE_FIELD: &'static str = "file";

    pub fn new(path: impl Into<PathBuf>, filename: impl Into<String>, mime: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            filename: filename.into(),
            mime: mime.into(),
            extra: FormFields::new().with("type", "upload"),
        }
    }

    /// Adds an extra text field to the multipart body.
    pub fn with_field(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.extra.insert(key, value);
        self
    }
}

/// The parameters of one request, tagged with their encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Params {
    /// No parameters; write requests send an empty body.
    #[default]
    None,
    /// Flat fields, the shape nearly every endpoint uses.
    Form(FormFields),
    /// Fields nested under one key (group endpoints).
    Nested(NestedForm),
    /// A multipart file upload.
    Upload(FileUpload),
}

impl Params {
    /// Short name of the encoding, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Params::None => "none",
            Params::Form(_) => "form",
            Params::Nested(_) => "nested",
            Params::Upload(_) => "upload",
        }
    }

    /// Returns the flat query pairs for a GET request.
    ///
    /// Uploads cannot be expressed as a query and yield `None`.
    pub fn query_fields(&self) -> Option<FormFields> {
        match self {
            Params::None => Some(FormFields::new()),
            Params::Form(fields) => Some(fields.clone()),
            Params::Nested(nested) => Some(nested.flatten()),
            Params::Upload(_) => None,
        }
    }
}

impl From<FormFields> for Params {
    fn from(fields: FormFields) -> Self {
        if fields.is_empty() {
            Params::None
        } else {
            Params::Form(fields)
        }
    }
}

impl From<NestedForm> for Params {
    fn from(nested: NestedForm) -> Self {
        Params::Nested(nested)
    }
}

impl From<FileUpload> for Params {
    fn from(upload: FileUpload) -> Self {
        Params::Upload(upload)
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Params::None => Ok(()),
            Params::Form(fields) => f.write_str(&fields.encode()),
            Params::Nested(nested) => f.write_str(&nested.encode()),
            Params::Upload(upload) => write!(
                f,
                "{} ({}, {}) {}",
                upload.path.display(),
                upload.filename,
                upload.mime,
                upload.extra.encode()
            ),
        }
    }
}

/// Form-urlencodes a single value (spaces become `+`).
pub fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Builds the query string of a GET request.
///
/// The caller's fields come first, followed by the `forced` pairs, which
/// override any caller value under the same key.
pub fn build_query(fields: &FormFields, forced: &[(String, String)]) -> String {
    let mut all = fields.clone();
    for (k, v) in forced {
        all.insert(k.clone(), v);
    }
    all.to_query_string()
}
