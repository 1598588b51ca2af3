//! Session persistence across invocations: login → whoami → logout.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test(flavor = "multi_thread")]
async fn test_login_whoami_logout_roundtrip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/email-signin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": {
                "userId": 3,
                "name": "St. Mary Hospital",
                "email": "admin@stmary.example",
                "userType": "HOSPITAL",
                "accessCode": "HC-3003"
            }
        })))
        .mount(&server)
        .await;

    let home = tempdir().unwrap();

    cargo_bin_cmd!("medgal")
        .env("MEDGAL_HOME", home.path())
        .env("MEDGAL_API_URL", server.uri())
        .args(["login", "--email", "admin@stmary.example", "--password", "pw12345"])
        .assert()
        .success();

    // A fresh process restores the identity from disk.
    cargo_bin_cmd!("medgal")
        .env("MEDGAL_HOME", home.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("St. Mary Hospital"))
        .stdout(predicate::str::contains("Hospital"))
        .stdout(predicate::str::contains("HC-3003"));

    cargo_bin_cmd!("medgal")
        .env("MEDGAL_HOME", home.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed out."));

    cargo_bin_cmd!("medgal")
        .env("MEDGAL_HOME", home.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in."));

    // Logout is idempotent.
    cargo_bin_cmd!("medgal")
        .env("MEDGAL_HOME", home.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("No active session."));
}

#[test]
fn test_corrupt_session_file_fails_open() {
    let home = tempdir().unwrap();
    std::fs::write(home.path().join("session.json"), "{not json").unwrap();

    cargo_bin_cmd!("medgal")
        .env("MEDGAL_HOME", home.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in."));
}
