//
//  discourse-api
//  api/forum/categories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Category endpoints.

use crate::api::common::{ApiError, ApiResponse, FormFields};
use crate::api::{ApiRequest, DiscourseClient};

/// Editable settings of a category, sent by [`DiscourseClient::update_category`].
///
/// Every field is sent; the defaults mirror a freshly created category.
/// `permissions` maps group names to permission levels
/// (1 = full, 2 = create/reply/see, 3 = see) and is sent as
/// `permissions[<group>]=<level>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryUpdate {
    pub name: String,
    pub slug: String,
    pub color: String,
    pub text_color: String,
    pub allow_badges: bool,
    pub auto_close_based_on_last_post: bool,
    pub auto_close_hours: String,
    pub background_url: String,
    pub logo_url: String,
    pub contains_messages: bool,
    pub email_in: String,
    pub email_in_allow_strangers: bool,
    pub parent_category_id: Option<u64>,
    pub position: Option<u32>,
    pub suppress_from_homepage: bool,
    pub topic_template: String,
    pub permissions: Vec<(String, u8)>,
}

impl Default for CategoryUpdate {
    fn default() -> Self {
        Self {
            name: String::new(),
            slug: String::new(),
            color: "0E76BD".to_string(),
            text_color: "FFFFFF".to_string(),
            allow_badges: true,
            auto_close_based_on_last_post: false,
            auto_close_hours: String::new(),
            background_url: String::new(),
            logo_url: String::new(),
            contains_messages: false,
            email_in: String::new(),
            email_in_allow_strangers: false,
            parent_category_id: None,
            position: None,
            suppress_from_homepage: false,
            topic_template: String::new(),
            permissions: Vec::new(),
        }
    }
}

impl CategoryUpdate {
    pub fn to_fields(&self) -> FormFields {
        let mut fields = FormFields::new()
            .with("allow_badges", self.allow_badges)
            .with(
                "auto_close_based_on_last_post",
                self.auto_close_based_on_last_post,
            )
            .with("auto_close_hours", &self.auto_close_hours)
            .with("background_url", &self.background_url)
            .with("color", &self.color)
            .with("contains_messages", self.contains_messages)
            .with("email_in", &self.email_in)
            .with("email_in_allow_strangers", self.email_in_allow_strangers)
            .with("logo_url", &self.logo_url)
            .with("name", &self.name)
            .with(
                "parent_category_id",
                self.parent_category_id
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
            )
            .with(
                "position",
                self.position.map(|p| p.to_string()).unwrap_or_default(),
            )
            .with("slug", &self.slug)
            .with("suppress_from_homepage", self.suppress_from_homepage)
            .with("text_color", &self.text_color)
            .with("topic_template", &self.topic_template);

        for (group, level) in &self.permissions {
            fields.insert(format!("permissions[{}]", group), level);
        }
        fields
    }
}

impl DiscourseClient {
    /// Lists all categories.
    pub async fn get_categories(&self) -> Result<ApiResponse, ApiError> {
        self.get("/categories.json", FormFields::new()).await
    }

    /// Fetches a category with its topic list, by id or slug.
    pub async fn get_category(&self, id_or_slug: &str) -> Result<ApiResponse, ApiError> {
        self.get(&format!("/c/{}.json", id_or_slug), FormFields::new())
            .await
    }

    /// Creates a category acting as `username` (the default user when `None`).
    ///
    /// Colors are six hex digits without `#`.
    pub async fn create_category(
        &self,
        name: &str,
        color: &str,
        text_color: Option<&str>,
        username: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let params = FormFields::new()
            .with("name", name)
            .with("color", color)
            .with("text_color", text_color.unwrap_or("000000"));

        let mut request = ApiRequest::post("/categories").params(params);
        if let Some(username) = username {
            request = request.as_user(username);
        }
        self.execute(request).await
    }

    /// Replaces the settings of category `id`.
    pub async fn update_category(
        &self,
        id: u64,
        update: &CategoryUpdate,
    ) -> Result<ApiResponse, ApiError> {
        self.put(&format!("/categories/{}", id), update.to_fields())
            .await
    }
}
