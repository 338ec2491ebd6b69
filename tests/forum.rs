//
//  discourse-api
//  tests/forum.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Endpoint wrappers against a mock forum.

use std::io::Write;

use chrono::{TimeZone, Utc};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

use discourse_api::api::forum::{NewGroup, NewUser};
use discourse_api::api::{ApiError, ClientConfig, DiscourseClient, FormFields, Protocol};

fn client_for(server: &ServerGuard) -> DiscourseClient {
    DiscourseClient::new(
        ClientConfig::new(server.host_with_port(), "test-api-key").with_protocol(Protocol::Http),
    )
    .unwrap()
}

async fn mock_group(server: &mut ServerGuard, name: &str, id: u64) -> mockito::Mock {
    server
        .mock("GET", format!("/groups/{}.json", name).as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({"group": {"id": id, "name": name}}).to_string())
        .create_async()
        .await
}

#[tokio::test]
async fn join_group_resolves_id_then_adds_member() {
    let mut server = Server::new_async().await;
    let lookup = mock_group(&mut server, "beta", 41).await;
    let join = server
        .mock("PUT", "/groups/41/members.json")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body("usernames=alice")
        .with_status(200)
        .with_body(r#"{"success":"OK","usernames":["alice"]}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let response = client.join_group("beta", "alice").await.unwrap().unwrap();

    lookup.assert_async().await;
    join.assert_async().await;
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn join_unknown_group_makes_no_write() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/groups/ghosts.json")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"errors":["not found"]}"#)
        .create_async()
        .await;
    let join = server
        .mock("PUT", Matcher::Regex("^/groups/.*/members.json$".into()))
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let result = client.join_group("ghosts", "alice").await.unwrap();

    assert!(result.is_none());
    join.assert_async().await;
}

#[tokio::test]
async fn leave_group_deletes_by_user_id() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/users/alice.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"user":{"id":7,"username":"alice"}}"#)
        .create_async()
        .await;
    mock_group(&mut server, "beta", 41).await;
    let leave = server
        .mock("DELETE", "/groups/41/members.json")
        .match_body("user_id=7")
        .with_status(200)
        .with_body(r#"{"success":"OK"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let response = client.leave_group("beta", "alice").await.unwrap().unwrap();

    leave.assert_async().await;
    assert!(response.is_success());
}

#[tokio::test]
async fn leave_group_with_unknown_user_is_an_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/users/nobody.json")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"errors":["not found"]}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let error = client.leave_group("beta", "nobody").await.unwrap_err();
    assert!(matches!(error, ApiError::UnexpectedPayload(_)));
}

#[tokio::test]
async fn add_group_skips_existing_group() {
    let mut server = Server::new_async().await;
    mock_group(&mut server, "staff-helpers", 12).await;
    let create = server
        .mock("POST", "/admin/groups")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let result = client
        .add_group(&NewGroup::new("staff-helpers"))
        .await
        .unwrap();

    assert!(result.is_none());
    create.assert_async().await;
}

#[tokio::test]
async fn add_group_posts_nested_form() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/groups/staff-helpers.json")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body("{}")
        .create_async()
        .await;
    let create = server
        .mock("POST", "/admin/groups")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("^group%5Bname%5D=staff-helpers&group%5Busernames%5D=a%2Cb&".into()),
            Matcher::Regex("group%5Balias_level%5D=3".into()),
            Matcher::Regex("group%5Bvisible%5D=true".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"basic_group":{"id":55}}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let group = NewGroup::new("staff-helpers").with_usernames(["a", "b"]);
    let response = client.add_group(&group).await.unwrap().unwrap();

    create.assert_async().await;
    assert_eq!(response.pointer("/basic_group/id"), Some(&json!(55)));
}

#[tokio::test]
async fn create_user_answers_honeypot_challenge() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/users/hp.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"value":"honey","challenge":"abc123"}"#)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/users")
        .match_body(
            "name=Jo+Bloggs&username=jo&email=jo%40example.com&password=pw\
             &challenge=321cba&password_confirmation=honey&active=true",
        )
        .with_status(200)
        .with_body(r#"{"success":true,"active":true,"user_id":9}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let user = NewUser::new("Jo Bloggs", "jo", "jo@example.com", "pw");
    let response = client.create_user(&user).await.unwrap().unwrap();

    create.assert_async().await;
    assert_eq!(response.pointer("/user_id"), Some(&json!(9)));
}

#[tokio::test]
async fn create_user_without_honeypot_returns_none() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/users/hp.json")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(r#"{"errors":["forbidden"]}"#)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/users")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let user = NewUser::new("Jo Bloggs", "jo", "jo@example.com", "pw");
    assert!(client.create_user(&user).await.unwrap().is_none());
    create.assert_async().await;
}

#[tokio::test]
async fn sync_sso_posts_signed_payload() {
    let mut server = Server::new_async().await;
    let sync = server
        .mock("POST", "/admin/users/sync_sso")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded(
                "sso".into(),
                "ZW1haWw9am8lNDBleGFtcGxlLmNvbSZ1c2VybmFtZT1qbytibG9nZ3MmZXh0ZXJuYWxfaWQ9NDI="
                    .into(),
            ),
            Matcher::UrlEncoded(
                "sig".into(),
                "17b709fc9bb3b6a94b0c0e81167634a7201bec6eeeb05a56c68b8d06b30a39c2".into(),
            ),
        ]))
        .with_status(200)
        .with_body(r#"{"id":9,"username":"jo_bloggs"}"#)
        .create_async()
        .await;

    let client = DiscourseClient::new(
        ClientConfig::new(server.host_with_port(), "test-api-key")
            .with_protocol(Protocol::Http)
            .with_sso_secret("s3cr3t"),
    )
    .unwrap();
    let response = client
        .sync_sso(
            "jo@example.com",
            "jo bloggs",
            &FormFields::new().with("external_id", 42),
        )
        .await
        .unwrap();

    sync.assert_async().await;
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn sync_sso_without_secret_fails_before_sending() {
    let mut server = Server::new_async().await;
    let sync = server
        .mock("POST", "/admin/users/sync_sso")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let error = client
        .sync_sso("jo@example.com", "jo", &FormFields::new())
        .await
        .unwrap_err();

    assert!(matches!(error, ApiError::MissingSsoSecret));
    sync.assert_async().await;
}

#[tokio::test]
async fn username_lookup_by_email_ignores_case() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/admin/users/list/active.json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("filter".into(), "Jo@Example.com".into()),
            Matcher::UrlEncoded("show_emails".into(), "true".into()),
        ]))
        .with_status(200)
        .with_body(
            json!([
                {"id": 3, "username": "jo_other", "email": "jo.other@example.com"},
                {"id": 9, "username": "jo", "email": "jo@example.com"}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    assert_eq!(
        client.get_username_by_email("Jo@Example.com").await.unwrap(),
        Some("jo".to_string())
    );
}

#[tokio::test]
async fn update_post_sends_decoded_raw() {
    let mut server = Server::new_async().await;
    let update = server
        .mock("PUT", "/posts/15")
        .match_header("Api-Username", "alice")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("post[cooked]".into(), "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;".into()),
            Matcher::UrlEncoded("post[raw]".into(), "<b>Tom & Jerry</b>".into()),
            Matcher::UrlEncoded("post[edit_reason]".into(), "".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"post":{"id":15}}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    client
        .update_post("&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;", 15, Some("alice"))
        .await
        .unwrap();

    update.assert_async().await;
}

#[tokio::test]
async fn suspend_sends_date_reason_and_post_action() {
    let mut server = Server::new_async().await;
    let suspend = server
        .mock("PUT", "/admin/users/9/suspend")
        .match_body("suspend_until=2030-01-02&reason=spam&message=&post_action=delete")
        .with_status(200)
        .with_body(r#"{"suspension":{"suspended_till":"2030-01-02T00:00:00Z"}}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let until = Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap();
    client.suspend_user_by_id(9, &until, "spam").await.unwrap();

    suspend.assert_async().await;
}

#[tokio::test]
async fn notification_level_acts_as_source_user() {
    let mut server = Server::new_async().await;
    let normal = server
        .mock("PUT", "/u/bob/notification_level.json")
        .match_header("Api-Username", "alice")
        .match_body("notification_level=normal")
        .with_status(200)
        .with_body(r#"{"success":"OK"}"#)
        .create_async()
        .await;
    let ignore = server
        .mock("PUT", "/u/carol/notification_level.json")
        .match_header("Api-Username", "alice")
        .match_body("notification_level=ignore&expiring_at=2030-06-30")
        .with_status(200)
        .with_body(r#"{"success":"OK"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let until = Utc.with_ymd_and_hms(2030, 6, 30, 12, 0, 0).unwrap();
    client
        .change_notification_level("alice", "bob", &until, false)
        .await
        .unwrap();
    client
        .change_notification_level("alice", "carol", &until, true)
        .await
        .unwrap();

    normal.assert_async().await;
    ignore.assert_async().await;
}

#[tokio::test]
async fn external_id_lookup_follows_to_admin_record() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/users/by-external/ext-1.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"user":{"id":9,"username":"jo"}}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/admin/users/9.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"id":9,"username":"jo","email":"jo@example.com"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/users/by-external/missing.json")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"errors":["not found"]}"#)
        .create_async()
        .await;

    let client = client_for(&server);

    let user = client
        .get_discourse_user_from_external_id("ext-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user["email"], json!("jo@example.com"));
    assert_eq!(
        client
            .get_discourse_user_id_from_external_id("ext-1")
            .await
            .unwrap(),
        Some(9)
    );

    assert!(client
        .get_discourse_user_from_external_id("missing")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn site_setting_is_keyed_by_name() {
    let mut server = Server::new_async().await;
    let setting = server
        .mock("PUT", "/admin/site_settings/max_image_size_kb")
        .match_body("max_image_size_kb=4096")
        .with_status(200)
        .with_body("")
        .create_async()
        .await;

    let client = client_for(&server);
    let response = client
        .change_site_setting("max_image_size_kb", 4096)
        .await
        .unwrap();

    setting.assert_async().await;
    assert_eq!(response.text(), Some(""));
}

#[tokio::test]
async fn upload_image_posts_file_part() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"JPEGDATA").unwrap();

    let mut server = Server::new_async().await;
    let upload = server
        .mock("POST", "/uploads.json")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="avatar.jpg""#.into()),
            Matcher::Regex("(?i)content-type: image/jpeg".into()),
            Matcher::Regex("name=\"type\"\r\n\r\nupload".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"id":4,"short_url":"upload://abc.jpeg"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let response = client
        .upload_image(file.path(), "avatar.jpg", "image/jpeg")
        .await
        .unwrap();

    upload.assert_async().await;
    assert_eq!(response.pointer("/short_url"), Some(&json!("upload://abc.jpeg")));
}
