//
//  discourse-api
//  tests/cli.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use assert_cmd::Command;
use predicates::prelude::*;

fn discourse() -> Command {
    Command::cargo_bin("discourse").unwrap()
}

#[test]
fn help_lists_commands() {
    discourse()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("api"))
        .stdout(predicate::str::contains("sso"))
        .stdout(predicate::str::contains("auth"));
}

#[test]
fn version_prints_crate_version() {
    discourse()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn bash_completion_is_generated() {
    discourse()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_discourse"));
}

#[test]
fn unknown_command_is_a_usage_error() {
    discourse()
        .arg("frobnicate")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn debug_requests_flag_traces_to_stderr() {
    let home = tempfile::tempdir().unwrap();
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    discourse()
        .env_remove("DISCOURSE_DEBUG")
        .env_remove("DISCOURSE_HOST")
        .env("NO_COLOR", "1")
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env("DISCOURSE_API_KEY", "test-key")
        .env("DISCOURSE_SSO_SECRET", "test-secret")
        .args([
            "--host",
            &format!("http://127.0.0.1:{}", port),
            "--debug-requests",
            "api",
            "/latest.json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Discourse API request"))
        .stderr(predicate::str::contains("/latest.json"));
}

#[test]
fn requests_are_not_traced_by_default() {
    let home = tempfile::tempdir().unwrap();
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    discourse()
        .env_remove("DISCOURSE_DEBUG")
        .env_remove("DISCOURSE_DEBUG_REQUESTS")
        .env_remove("DISCOURSE_HOST")
        .env("NO_COLOR", "1")
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env("DISCOURSE_API_KEY", "test-key")
        .env("DISCOURSE_SSO_SECRET", "test-secret")
        .args(["--host", &format!("http://127.0.0.1:{}", port), "api", "/latest.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Discourse API request").not());
}
