//
//  discourse-api
//  api/forum/site.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Site settings and uploads.

use std::path::Path;

use crate::api::common::{ApiError, ApiResponse, FileUpload, FormFields};
use crate::api::DiscourseClient;

impl DiscourseClient {
    /// Changes one admin site setting.
    pub async fn change_site_setting(
        &self,
        name: &str,
        value: impl ToString,
    ) -> Result<ApiResponse, ApiError> {
        self.put(
            &format!("/admin/site_settings/{}", name),
            FormFields::new().with(name, value),
        )
        .await
    }

    /// Uploads an image as a multipart `file` part.
    ///
    /// `filename` is what the forum stores; `mime` is the part's content type
    /// (`image/png`, `image/jpeg`, ...).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Upload`] if `path` cannot be read.
    pub async fn upload_image(
        &self,
        path: impl AsRef<Path>,
        filename: &str,
        mime: &str,
    ) -> Result<ApiResponse, ApiError> {
        let upload = FileUpload::new(path.as_ref(), filename, mime);
        self.post("/uploads.json", upload).await
    }
}
