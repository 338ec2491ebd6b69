//
//  discourse-api
//  api/forum/groups.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Group endpoints.
//!
//! Membership and removal calls address groups by numeric id, so the
//! name-based wrappers resolve the id first and return `Ok(None)` when the
//! group does not exist.

use crate::api::common::{ApiError, ApiResponse, FormFields, NestedForm};
use crate::api::DiscourseClient;

/// Settings of a group to create with [`DiscourseClient::add_group`].
///
/// # Example
///
/// ```rust
/// use discourse_api::api::forum::NewGroup;
///
/// let group = NewGroup::new("beta-testers").with_usernames(["alice", "bob"]);
/// assert_eq!(group.usernames, vec!["alice", "bob"]);
/// assert_eq!(group.alias_level, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    pub name: String,
    /// Initial members.
    pub usernames: Vec<String>,
    /// Who may @mention the group (0 = nobody .. 3 = everyone).
    pub alias_level: u8,
    pub visible: bool,
    /// Email domains whose users join automatically, `|`-separated.
    pub automatic_membership_email_domains: String,
    pub automatic_membership_retroactive: bool,
    pub title: String,
    pub primary_group: bool,
    pub grant_trust_level: u8,
}

impl NewGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            usernames: Vec::new(),
            alias_level: 3,
            visible: true,
            automatic_membership_email_domains: String::new(),
            automatic_membership_retroactive: false,
            title: String::new(),
            primary_group: false,
            grant_trust_level: 0,
        }
    }

    pub fn with_usernames<I, S>(mut self, usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.usernames = usernames.into_iter().map(Into::into).collect();
        self
    }

    /// The `group[...]` form posted to `/admin/groups`.
    pub fn to_form(&self) -> NestedForm {
        let fields = FormFields::new()
            .with("name", &self.name)
            .with("usernames", self.usernames.join(","))
            .with("alias_level", self.alias_level)
            .with("visible", self.visible)
            .with(
                "automatic_membership_email_domains",
                &self.automatic_membership_email_domains,
            )
            .with(
                "automatic_membership_retroactive",
                self.automatic_membership_retroactive,
            )
            .with("title", &self.title)
            .with("primary_group", self.primary_group)
            .with("grant_trust_level", self.grant_trust_level);
        NestedForm::new("group", fields)
    }
}

impl DiscourseClient {
    /// Lists all groups.
    pub async fn get_groups(&self) -> Result<ApiResponse, ApiError> {
        self.get("/groups.json", FormFields::new()).await
    }

    /// Fetches one group by name.
    pub async fn get_group(&self, name: &str) -> Result<ApiResponse, ApiError> {
        self.get(&format!("/groups/{}.json", name), FormFields::new())
            .await
    }

    /// Resolves a group name to its id.
    ///
    /// Returns `Ok(None)` unless the lookup answers 200 with a `group.id`.
    pub async fn get_group_id_by_name(&self, name: &str) -> Result<Option<u64>, ApiError> {
        let response = self.get_group(name).await?;
        if response.status != 200 {
            return Ok(None);
        }
        Ok(response.pointer("/group/id").and_then(|id| id.as_u64()))
    }

    /// Lists the members of a group.
    pub async fn get_group_members(&self, name: &str) -> Result<ApiResponse, ApiError> {
        self.get(&format!("/groups/{}/members.json", name), FormFields::new())
            .await
    }

    /// Adds `username` to the group named `group`.
    pub async fn join_group(
        &self,
        group: &str,
        username: &str,
    ) -> Result<Option<ApiResponse>, ApiError> {
        let Some(group_id) = self.get_group_id_by_name(group).await? else {
            return Ok(None);
        };

        let params = FormFields::new().with("usernames", username);
        self.put(&format!("/groups/{}/members.json", group_id), params)
            .await
            .map(Some)
    }

    /// Removes `username` from the group named `group`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnexpectedPayload`] if the user record has no id.
    pub async fn leave_group(
        &self,
        group: &str,
        username: &str,
    ) -> Result<Option<ApiResponse>, ApiError> {
        let user_id = self.require_user_id(username).await?;
        let Some(group_id) = self.get_group_id_by_name(group).await? else {
            return Ok(None);
        };

        let params = FormFields::new().with("user_id", user_id);
        self.delete(&format!("/groups/{}/members.json", group_id), params)
            .await
            .map(Some)
    }

    /// Creates a group unless one with the same name exists.
    pub async fn add_group(&self, group: &NewGroup) -> Result<Option<ApiResponse>, ApiError> {
        if self.get_group_id_by_name(&group.name).await?.is_some() {
            tracing::debug!(group = %group.name, "Group already exists");
            return Ok(None);
        }

        self.post("/admin/groups", group.to_form()).await.map(Some)
    }

    /// Deletes the group named `name`.
    pub async fn remove_group(&self, name: &str) -> Result<Option<ApiResponse>, ApiError> {
        let Some(group_id) = self.get_group_id_by_name(name).await? else {
            return Ok(None);
        };

        self.delete(&format!("/admin/groups/{}", group_id), FormFields::new())
            .await
            .map(Some)
    }
}
