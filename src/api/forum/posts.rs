//
//  discourse-api
//  api/forum/posts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Post and topic endpoints.

use chrono::{DateTime, FixedOffset};

use crate::api::common::{ApiError, ApiResponse, FormFields};
use crate::api::{ApiRequest, DiscourseClient};

use super::iso8601;

const REGULAR_ARCHETYPE: &str = "regular";

/// A topic to create with [`DiscourseClient::create_topic`].
///
/// The first post of the topic carries `raw`.
///
/// # Example
///
/// ```rust
/// use discourse_api::api::forum::NewTopic;
///
/// let topic = NewTopic::new("Release notes", "v2 is out", "7", "alice");
/// assert_eq!(topic.reply_to_post_number, 0);
/// assert!(topic.created_at.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTopic {
    pub title: String,
    pub raw: String,
    /// Numeric category id. Slugs are not accepted by the endpoint.
    pub category: String,
    /// Author of the topic.
    pub username: String,
    pub reply_to_post_number: u64,
    /// Backdates the topic.
    pub created_at: Option<DateTime<FixedOffset>>,
}

impl NewTopic {
    pub fn new(
        title: impl Into<String>,
        raw: impl Into<String>,
        category: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            raw: raw.into(),
            category: category.into(),
            username: username.into(),
            reply_to_post_number: 0,
            created_at: None,
        }
    }

    pub fn created_at(mut self, at: DateTime<FixedOffset>) -> Self {
        self.created_at = Some(at);
        self
    }

    fn to_fields(&self) -> FormFields {
        let mut fields = FormFields::new()
            .with("title", &self.title)
            .with("raw", &self.raw)
            .with("category", &self.category)
            .with("archetype", REGULAR_ARCHETYPE)
            .with("reply_to_post_number", self.reply_to_post_number);
        if let Some(at) = &self.created_at {
            fields.insert("created_at", iso8601(at));
        }
        fields
    }
}

impl DiscourseClient {
    /// Replies to a topic as `username`.
    pub async fn create_post(
        &self,
        raw: &str,
        topic_id: u64,
        username: &str,
        created_at: Option<DateTime<FixedOffset>>,
    ) -> Result<ApiResponse, ApiError> {
        let mut params = FormFields::new()
            .with("raw", raw)
            .with("archetype", REGULAR_ARCHETYPE)
            .with("topic_id", topic_id);
        if let Some(at) = &created_at {
            params.insert("created_at", iso8601(at));
        }

        let request = ApiRequest::post("/posts").params(params).as_user(username);
        self.execute(request).await
    }

    pub async fn get_posts_by_number(
        &self,
        topic_id: u64,
        post_number: u64,
    ) -> Result<ApiResponse, ApiError> {
        self.get(
            &format!("/posts/by_number/{}/{}.json", topic_id, post_number),
            FormFields::new(),
        )
        .await
    }

    /// Replaces the body of a post with `html`.
    ///
    /// The raw body is the HTML with its entities decoded.
    pub async fn update_post(
        &self,
        html: &str,
        post_id: u64,
        username: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let params = FormFields::new()
            .with("post[cooked]", html)
            .with("post[edit_reason]", "")
            .with("post[raw]", decode_html_entities(html));

        let mut request = ApiRequest::put(format!("/posts/{}", post_id)).params(params);
        if let Some(username) = username {
            request = request.as_user(username);
        }
        self.execute(request).await
    }

    /// Creates a topic with its first post.
    ///
    /// Returns `Ok(None)` without a request when no category is given.
    pub async fn create_topic(&self, topic: &NewTopic) -> Result<Option<ApiResponse>, ApiError> {
        if topic.category.trim().is_empty() {
            return Ok(None);
        }

        let request = ApiRequest::post("/posts")
            .params(topic.to_fields())
            .as_user(&topic.username);
        self.execute(request).await.map(Some)
    }

    /// Fetches a topic by id or slug.
    pub async fn get_topic(&self, id_or_slug: &str) -> Result<ApiResponse, ApiError> {
        self.get(&format!("/t/{}.json", id_or_slug), FormFields::new())
            .await
    }

    /// Top topics of a category for `period` (`daily`, `weekly`, `monthly`,
    /// `yearly`); daily when `None`.
    pub async fn top_topics(
        &self,
        category: &str,
        period: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let period = period.unwrap_or("daily");
        self.get(
            &format!("/c/{}/l/top/{}.json", category, period),
            FormFields::new(),
        )
        .await
    }

    pub async fn latest_topics(&self, category: &str) -> Result<ApiResponse, ApiError> {
        self.get(&format!("/c/{}/l/latest.json", category), FormFields::new())
            .await
    }
}

/// Decodes the five entities HTML escaping produces.
///
/// `&amp;` goes last so `&amp;lt;` becomes `&lt;`, not `<`.
pub fn decode_html_entities(html: &str) -> String {
    html.replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decode_html_entities() {
        assert_eq!(
            decode_html_entities("&lt;p&gt;Tom &amp; &quot;Jerry&quot; &#039;s&lt;/p&gt;"),
            "<p>Tom & \"Jerry\" 's</p>"
        );
        assert_eq!(decode_html_entities("&amp;lt;"), "&lt;");
        assert_eq!(decode_html_entities("plain"), "plain");
    }

    #[test]
    fn test_topic_fields() {
        let at = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2004, 2, 12, 15, 19, 21)
            .unwrap();
        let fields = NewTopic::new("Hello", "World", "3", "alice")
            .created_at(at)
            .to_fields();

        assert_eq!(fields.get("archetype"), Some("regular"));
        assert_eq!(fields.get("reply_to_post_number"), Some("0"));
        assert_eq!(fields.get("created_at"), Some("2004-02-12T15:19:21+00:00"));
        assert_eq!(fields.get("username"), None);
    }
}
