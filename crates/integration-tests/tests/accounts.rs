//! End-to-end tests for registration, login and profiles.
//!
//! These tests require a migrated database and a running server
//! (cargo run -p salesbook-web). Run with: cargo test -- --ignored

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use salesbook_integration_tests::{PASSWORD, Session, base_url, client, location, unique_username};

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_health() {
    let resp = client().get(format!("{}/health", base_url())).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_anonymous_pages_redirect_to_login() {
    let client = client();
    for path in ["/", "/products", "/customers/new", "/profile/new"] {
        let resp = client.get(format!("{}{path}", base_url())).send().await.unwrap();
        assert_eq!(location(&resp), "/login", "GET {path}");
    }
}

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_data_requires_login() {
    let resp = client().get(format!("{}/data", base_url())).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_register_rejects_mismatched_passwords() {
    let client = client();
    let username = unique_username("mismatch");
    let resp = client
        .post(format!("{}/register", base_url()))
        .form(&[
            ("username", username.as_str()),
            ("password1", PASSWORD),
            ("password2", "something-else"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("The two password fields didn"));
}

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_register_rejects_taken_username() {
    let session = Session::new("taken").await;

    let resp = client()
        .post(format!("{}/register", base_url()))
        .form(&[
            ("username", session.username.as_str()),
            ("password1", PASSWORD),
            ("password2", PASSWORD),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("A user with that username already exists."));
}

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_login_with_wrong_password_shows_message() {
    let session = Session::new("wrongpw").await;

    let resp = client()
        .post(format!("{}/login", base_url()))
        .form(&[("username", session.username.as_str()), ("password", "not-the-password")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Username or Password is incorrect."));
}

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_logged_in_user_is_sent_away_from_login() {
    let session = Session::new("loggedin").await;
    let resp = session.get("/login").await;
    assert_eq!(location(&resp), "/");
}

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_profile_completion_flash_and_detail() {
    let session = Session::new("profile").await;

    let body = session.page("/").await;
    assert!(body.contains("Successfully created profile for:  Test Seller"));

    let profile_id = salesbook_integration_tests::id_after(&body, "/profile/").unwrap();
    let body = session.page(&format!("/profile/{profile_id}")).await;
    assert!(body.contains("seller@example.com"));
    assert!(body.contains(&session.username));
}

#[tokio::test]
#[ignore = "Requires running salesbook server"]
async fn test_logout_ends_session() {
    let session = Session::new("logout").await;

    let resp = session.post("/logout", &[]).await;
    assert_eq!(location(&resp), "/login");

    let resp = session.get("/").await;
    assert_eq!(location(&resp), "/login");
}
