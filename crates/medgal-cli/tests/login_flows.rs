//! End-to-end login flows against a mock API server.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn identity_envelope(user_type: &str) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "message": "ok",
        "data": {
            "userId": 7,
            "name": "Ada Lovelace",
            "email": "user@example.com",
            "userType": user_type,
            "accessCode": "AC-7007"
        }
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn test_otp_login_persists_the_identity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/send-otp"))
        .and(body_json(serde_json::json!({
            "contact": "user@example.com",
            "userType": "PATIENT"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "message": "OTP sent"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/verify-otp"))
        .and(body_json(serde_json::json!({
            "contact": "user@example.com",
            "otpCode": "123456"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(identity_envelope("PATIENT")))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    cargo_bin_cmd!("medgal")
        .env("MEDGAL_HOME", home.path())
        .env("MEDGAL_API_URL", server.uri())
        .args(["login", "--otp", "user@example.com", "--role", "patient"])
        .write_stdin("123456\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in as Ada Lovelace"));

    // The persisted session holds the patient identity.
    let session = std::fs::read_to_string(home.path().join("session.json")).unwrap();
    let session: serde_json::Value = serde_json::from_str(&session).unwrap();
    assert_eq!(session["userType"], "PATIENT");
    assert_eq!(session["accessCode"], "AC-7007");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_otp_leaves_no_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/send-otp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "message": "OTP sent"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/verify-otp"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "success": false,
            "message": "Invalid OTP"
        })))
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    cargo_bin_cmd!("medgal")
        .env("MEDGAL_HOME", home.path())
        .env("MEDGAL_API_URL", server.uri())
        .args(["login", "--otp", "user@example.com", "--role", "patient"])
        .write_stdin("000000\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid OTP"));

    assert!(!home.path().join("session.json").exists());
}

#[test]
fn test_unreachable_server_is_reported_distinctly() {
    let home = tempdir().unwrap();
    cargo_bin_cmd!("medgal")
        .env("MEDGAL_HOME", home.path())
        // Port 9 (discard) is almost certainly closed.
        .env("MEDGAL_API_URL", "http://127.0.0.1:9/api")
        .args(["login", "--email", "user@example.com", "--password", "hunter22"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot reach the server"));

    assert!(!home.path().join("session.json").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_email_login_surfaces_server_rejection_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/email-signin"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "success": false,
            "message": "Invalid email or password"
        })))
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    cargo_bin_cmd!("medgal")
        .env("MEDGAL_HOME", home.path())
        .env("MEDGAL_API_URL", server.uri())
        .args(["login", "--email", "user@example.com", "--password", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid email or password"));
}
