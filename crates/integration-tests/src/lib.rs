//! End-to-end test helpers for Salesbook.
//!
//! # Running Tests
//!
//! ```bash
//! # Migrate and start the server
//! cargo run -p salesbook-cli -- migrate
//! cargo run -p salesbook-web
//!
//! # Run the ignored end-to-end tests
//! cargo test -p salesbook-integration-tests -- --ignored
//! ```
//!
//! `SALES_TEST_URL` points the tests at another server
//! (default: `http://localhost:8000`). Every test registers its own
//! throwaway account, so runs do not interfere with each other.

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Client, Response, StatusCode};
use uuid::Uuid;

/// Password used for every throwaway account.
pub const PASSWORD: &str = "correct-horse-battery";

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("SALES_TEST_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

/// A username nobody has registered yet.
#[must_use]
pub fn unique_username(prefix: &str) -> String {
    format!("{prefix}_{}", &Uuid::new_v4().simple().to_string()[..12])
}

/// A cookie-keeping client that does not follow redirects, so tests can
/// assert on `Location`.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// The `Location` of a 303 response.
#[must_use]
pub fn location(resp: &Response) -> String {
    assert_eq!(resp.status(), StatusCode::SEE_OTHER, "expected a redirect");
    resp.headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("redirect without Location")
        .to_string()
}

/// A logged-in session for a freshly registered user.
pub struct Session {
    pub client: Client,
    pub base_url: String,
    pub username: String,
}

impl Session {
    /// Register, log in and complete the profile.
    pub async fn new(prefix: &str) -> Self {
        let session = Self {
            client: client(),
            base_url: base_url(),
            username: unique_username(prefix),
        };

        let resp = session
            .post(
                "/register",
                &[
                    ("username", session.username.as_str()),
                    ("password1", PASSWORD),
                    ("password2", PASSWORD),
                ],
            )
            .await;
        assert_eq!(location(&resp), "/login");

        let resp = session
            .post(
                "/login",
                &[("username", session.username.as_str()), ("password", PASSWORD)],
            )
            .await;
        assert_eq!(location(&resp), "/profile/new");

        let resp = session
            .post(
                "/profile/new",
                &[
                    ("first_name", "Test"),
                    ("last_name", "Seller"),
                    ("phone", "555-0100"),
                    ("email", "seller@example.com"),
                    ("address", "1 Market St"),
                ],
            )
            .await;
        assert_eq!(location(&resp), "/");

        session
    }

    /// GET a path relative to the base URL.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("GET failed")
    }

    /// GET a path and return the body of a 200 response.
    pub async fn page(&self, path: &str) -> String {
        let resp = self.get(path).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {path}");
        resp.text().await.expect("Failed to read body")
    }

    /// POST a urlencoded form.
    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(format!("{}{path}", self.base_url))
            .form(form)
            .send()
            .await
            .expect("POST failed")
    }

    /// Create a customer and return its id.
    pub async fn create_customer(&self, name: &str) -> i32 {
        let resp = self
            .post(
                "/customers/new",
                &[
                    ("name", name),
                    ("phone", "555-0199"),
                    ("email", "buyer@example.com"),
                    ("address", "2 Harbor Rd"),
                ],
            )
            .await;
        assert_eq!(location(&resp), "/");

        let body = self.page(&format!("/?q={name}")).await;
        id_after(&body, "/customers/").expect("customer missing from dashboard")
    }

    /// Create a product and return its id.
    pub async fn create_product(&self, name: &str, price: &str, inventory: i32) -> i32 {
        let inventory = inventory.to_string();
        let resp = self
            .post(
                "/products/new",
                &[("name", name), ("price", price), ("inventory", &inventory)],
            )
            .await;
        assert_eq!(location(&resp), "/products");

        let body = self.page(&format!("/products?name={name}")).await;
        id_after(&body, "/products/").expect("product missing from list")
    }
}

/// The first integer that follows `prefix` in `body`.
#[must_use]
pub fn id_after(body: &str, prefix: &str) -> Option<i32> {
    body.match_indices(prefix).find_map(|(at, _)| {
        let rest = body.get(at + prefix.len()..)?;
        let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        rest.get(..end)?.parse().ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_after_skips_non_numeric_links() {
        let body = r#"<a href="/customers/new">New</a> <a href="/customers/42">Acme</a>"#;
        assert_eq!(id_after(body, "/customers/"), Some(42));
        assert_eq!(id_after(body, "/products/"), None);
    }

    #[test]
    fn test_unique_username_is_unique() {
        assert_ne!(unique_username("a"), unique_username("a"));
        assert!(unique_username("seller").starts_with("seller_"));
    }
}
