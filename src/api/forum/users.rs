//
//  discourse-api
//  api/forum/users.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! User endpoints.
//!
//! Covers lookups (by username, internal id, external SSO id, email),
//! account provisioning and moderation, per-user notification levels, and
//! the SSO sync call.

use chrono::{DateTime, TimeZone};
use serde_json::Value;

use crate::api::common::{ApiError, ApiResponse, FormFields};
use crate::api::{ApiRequest, DiscourseClient};
use crate::auth::sso;

use super::date_only;

/// A user to create with [`DiscourseClient::create_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    /// Activate immediately instead of sending a confirmation email.
    pub active: bool,
}

impl NewUser {
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            username: username.into(),
            email: email.into(),
            password: password.into(),
            active: true,
        }
    }
}

impl DiscourseClient {
    pub async fn get_user_by_username(&self, username: &str) -> Result<ApiResponse, ApiError> {
        self.get(&format!("/users/{}.json", username), FormFields::new())
            .await
    }

    /// Fetches the full admin record, including `single_sign_on_record`.
    pub async fn get_user_by_discourse_id(&self, id: u64) -> Result<ApiResponse, ApiError> {
        self.get(&format!("/admin/users/{}.json", id), FormFields::new())
            .await
    }

    /// Fetches a user by the external id of their SSO record.
    pub async fn get_user_by_external_id(&self, external_id: &str) -> Result<ApiResponse, ApiError> {
        self.get(
            &format!("/users/by-external/{}.json", external_id),
            FormFields::new(),
        )
        .await
    }

    pub async fn get_user_badges_by_username(&self, username: &str) -> Result<ApiResponse, ApiError> {
        self.get(&format!("/user-badges/{}.json", username), FormFields::new())
            .await
    }

    /// Resolves an external SSO id to the full admin user record.
    ///
    /// Returns `Ok(None)` on 404 or when the lookup carries no `user.id`.
    pub async fn get_discourse_user_from_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Value>, ApiError> {
        let response = self.get_user_by_external_id(external_id).await?;
        if response.status == 404 {
            return Ok(None);
        }

        let Some(id) = response.pointer("/user/id").and_then(Value::as_u64) else {
            return Ok(None);
        };

        let full = self.get_user_by_discourse_id(id).await?;
        Ok(full.json().cloned())
    }

    /// Resolves an external SSO id to the internal user id.
    pub async fn get_discourse_user_id_from_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<u64>, ApiError> {
        let user = self.get_discourse_user_from_external_id(external_id).await?;
        Ok(user.and_then(|u| u.get("id").and_then(Value::as_u64)))
    }

    /// Finds an active user by email, compared case-insensitively.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<Value>, ApiError> {
        let response = self
            .get(
                "/admin/users/list/active.json",
                FormFields::new().with("filter", email),
            )
            .await?;

        let users = response.json().and_then(Value::as_array);
        Ok(users.and_then(|users| {
            users
                .iter()
                .find(|user| {
                    user.get("email")
                        .and_then(Value::as_str)
                        .is_some_and(|e| e.eq_ignore_ascii_case(email))
                })
                .cloned()
        }))
    }

    /// Finds the username of an active user by email.
    pub async fn get_username_by_email(&self, email: &str) -> Result<Option<String>, ApiError> {
        let user = self.get_user_by_email(email).await?;
        Ok(user.and_then(|u| u.get("username").and_then(Value::as_str).map(String::from)))
    }

    /// Creates a user account.
    ///
    /// Discourse requires the honeypot challenge from `/users/hp.json`: the
    /// challenge is sent reversed and the honeypot value goes into
    /// `password_confirmation`. Returns `Ok(None)` if the challenge cannot
    /// be fetched.
    pub async fn create_user(&self, user: &NewUser) -> Result<Option<ApiResponse>, ApiError> {
        let honeypot = self.get("/users/hp.json", FormFields::new()).await?;
        if honeypot.status != 200 {
            tracing::warn!(status = honeypot.status, "Honeypot challenge unavailable");
            return Ok(None);
        }

        let challenge = honeypot
            .pointer("/challenge")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::UnexpectedPayload("missing honeypot challenge".to_string()))?;
        let value = honeypot
            .pointer("/value")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::UnexpectedPayload("missing honeypot value".to_string()))?;

        let params = FormFields::new()
            .with("name", &user.name)
            .with("username", &user.username)
            .with("email", &user.email)
            .with("password", &user.password)
            .with("challenge", challenge.chars().rev().collect::<String>())
            .with("password_confirmation", value)
            .with("active", user.active);

        self.post("/users", params).await.map(Some)
    }

    pub async fn activate_user(&self, id: u64) -> Result<ApiResponse, ApiError> {
        self.put(&format!("/admin/users/{}/activate", id), FormFields::new())
            .await
    }

    /// Updates profile fields (`name`, `title`, `bio_raw`, `location`, ...)
    /// acting as the user themself.
    pub async fn set_user_info(
        &self,
        username: &str,
        fields: FormFields,
    ) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest::put(format!("/u/{}.json", username))
            .params(fields)
            .as_user(username);
        self.execute(request).await
    }

    pub async fn logout_user_by_id(&self, id: u64) -> Result<ApiResponse, ApiError> {
        self.post(&format!("/admin/users/{}/log_out", id), FormFields::new())
            .await
    }

    /// Logs a user out of every session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnexpectedPayload`] if the username cannot be resolved.
    pub async fn logout_user_by_username(&self, username: &str) -> Result<ApiResponse, ApiError> {
        let id = self.require_user_id(username).await?;
        self.logout_user_by_id(id).await
    }

    /// Suspends a user until the given day, deleting their offending post.
    pub async fn suspend_user_by_id<Tz: TimeZone>(
        &self,
        id: u64,
        until: &DateTime<Tz>,
        reason: &str,
    ) -> Result<ApiResponse, ApiError>
    where
        Tz::Offset: std::fmt::Display,
    {
        let params = FormFields::new()
            .with("suspend_until", date_only(until))
            .with("reason", reason)
            .with("message", "")
            .with("post_action", "delete");

        self.put(&format!("/admin/users/{}/suspend", id), params)
            .await
    }

    pub async fn unsuspend_user_by_id(&self, id: u64) -> Result<ApiResponse, ApiError> {
        self.put(&format!("/admin/users/{}/unsuspend", id), FormFields::new())
            .await
    }

    /// Makes `source` ignore `target` until the given day, or restores the
    /// normal level when `ignore` is false.
    pub async fn change_notification_level<Tz: TimeZone>(
        &self,
        source: &str,
        target: &str,
        until: &DateTime<Tz>,
        ignore: bool,
    ) -> Result<ApiResponse, ApiError>
    where
        Tz::Offset: std::fmt::Display,
    {
        let mut params = FormFields::new().with(
            "notification_level",
            if ignore { "ignore" } else { "normal" },
        );
        if ignore {
            params.insert("expiring_at", date_only(until));
        }

        let request = ApiRequest::put(format!("/u/{}/notification_level.json", target))
            .params(params)
            .as_user(source);
        self.execute(request).await
    }

    /// Invites `email` to a topic, acting as `username` (the default user
    /// when `None`).
    pub async fn invite_user(
        &self,
        email: &str,
        topic_id: u64,
        username: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let params = FormFields::new()
            .with("email", email)
            .with("topic_id", topic_id);

        let mut request = ApiRequest::post(format!("/t/{}/invite.json", topic_id)).params(params);
        if let Some(username) = username {
            request = request.as_user(username);
        }
        self.execute(request).await
    }

    /// Creates or updates an SSO user.
    ///
    /// `extra` carries further SSO attributes such as `external_id`,
    /// `add_groups` or `require_activation`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingSsoSecret`] without making a request when
    /// no SSO secret is configured.
    pub async fn sync_sso(
        &self,
        email: &str,
        username: &str,
        extra: &FormFields,
    ) -> Result<ApiResponse, ApiError> {
        let secret = self.sso_secret().ok_or(ApiError::MissingSsoSecret)?;
        let payload = sso::sign(&sso::sso_params(email, username, extra), secret);
        self.post("/admin/users/sync_sso", payload.to_fields())
            .await
    }

    /// Looks up the numeric id of `username`.
    pub(crate) async fn require_user_id(&self, username: &str) -> Result<u64, ApiError> {
        let response = self.get_user_by_username(username).await?;
        response
            .pointer("/user/id")
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                ApiError::UnexpectedPayload(format!(
                    "no user id for '{}' (status {})",
                    username, response.status
                ))
            })
    }
}
