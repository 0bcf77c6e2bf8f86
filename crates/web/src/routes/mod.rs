//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Dashboard (customers, recent orders, search)
//! GET  /data                    - JSON sales report for the dashboard charts
//!
//! # Auth
//! GET  /register                - Registration page (anonymous only)
//! POST /register                - Registration action
//! GET  /login                   - Login page (anonymous only)
//! POST /login                   - Login action
//! POST /logout                  - Logout action
//!
//! # Profile (owner only)
//! GET  /profile/new             - Complete own profile
//! POST /profile/new
//! GET  /profile/{profile_id}    - Profile detail
//! GET  /profile/{profile_id}/update
//! POST /profile/{profile_id}/update
//!
//! # Customers (owner only)
//! GET  /customers/new
//! POST /customers/new
//! GET  /customers/{customer_id}                      - Detail, stats, filtered orders
//! GET  /customers/{customer_id}/update
//! POST /customers/{customer_id}/update
//! GET  /customers/{customer_id}/delete               - Confirm page
//! POST /customers/{customer_id}/delete
//!
//! # Orders (owner of the customer only)
//! GET  /customers/{customer_id}/orders/new           - Up to three lines
//! POST /customers/{customer_id}/orders/new
//! GET  /customers/{customer_id}/orders/{order_id}/update
//! POST /customers/{customer_id}/orders/{order_id}/update
//! GET  /customers/{customer_id}/orders/{order_id}/delete
//! POST /customers/{customer_id}/orders/{order_id}/delete
//!
//! # Products
//! GET  /products                - Filtered, paginated catalog
//! GET  /products/new
//! POST /products/new
//! GET  /products/{product_id}/update
//! POST /products/{product_id}/update
//! GET  /products/{product_id}/delete
//! POST /products/{product_id}/delete
//! ```

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod data;
pub mod orders;
pub mod products;
pub mod profile;

use axum::{
    Router,
    routing::{get, post},
};

use serde::Deserialize;

use salesbook_core::pagination::Page;
use salesbook_core::{OrderStatus, StockLabel};

use crate::db::products::ProductChoice;
use crate::middleware::{Flash, Flashes};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Build the application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/data", get(data::sales_report))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .nest("/profile", profile_routes())
        .nest("/customers", customer_routes())
        .nest("/products", product_routes())
}

/// Create the profile routes router.
fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/new", get(profile::create_page).post(profile::create))
        .route("/{profile_id}", get(profile::show))
        .route(
            "/{profile_id}/update",
            get(profile::update_page).post(profile::update),
        )
}

/// Create the customer and order routes router.
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/new", get(customers::create_page).post(customers::create))
        .route("/{customer_id}", get(customers::show))
        .route(
            "/{customer_id}/update",
            get(customers::update_page).post(customers::update),
        )
        .route(
            "/{customer_id}/delete",
            get(customers::delete_page).post(customers::delete),
        )
        .route(
            "/{customer_id}/orders/new",
            get(orders::create_page).post(orders::create),
        )
        .route(
            "/{customer_id}/orders/{order_id}/update",
            get(orders::update_page).post(orders::update),
        )
        .route(
            "/{customer_id}/orders/{order_id}/delete",
            get(orders::delete_page).post(orders::delete),
        )
}

/// Create the product routes router.
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/new", get(products::create_page).post(products::create))
        .route(
            "/{product_id}/update",
            get(products::update_page).post(products::update),
        )
        .route(
            "/{product_id}/delete",
            get(products::delete_page).post(products::delete),
        )
}

// =============================================================================
// Shared view types
// =============================================================================

/// Navigation bar and flash area shared by every page.
pub struct Nav {
    pub user: Option<CurrentUser>,
    pub flashes: Vec<Flash>,
}

impl Nav {
    /// Nav for a logged-in user.
    #[must_use]
    pub fn user(user: CurrentUser, Flashes(flashes): Flashes) -> Self {
        Self {
            user: Some(user),
            flashes,
        }
    }

    /// Nav for an anonymous visitor.
    #[must_use]
    pub fn anonymous(Flashes(flashes): Flashes) -> Self {
        Self {
            user: None,
            flashes,
        }
    }

    /// Add a message shown on this render only.
    #[must_use]
    pub fn with(mut self, flash: Flash) -> Self {
        self.flashes.push(flash);
        self
    }
}

/// Previous/next links for one paginated list.
pub struct Pager {
    pub number: u32,
    pub num_pages: u32,
    pub total_items: u64,
    pub first_href: Option<String>,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    pub last_href: Option<String>,
}

impl Pager {
    /// Build links that set `param` and keep the other query parameters.
    #[must_use]
    pub fn new<T>(page: &Page<T>, param: &str, keep: &[(&str, &str)]) -> Self {
        let href = |number: u32| {
            let number = number.to_string();
            let mut pairs = keep.to_vec();
            pairs.push((param, &number));
            format!("?{}", query_string(&pairs))
        };

        Self {
            number: page.number(),
            num_pages: page.num_pages(),
            total_items: page.total_items(),
            first_href: page.has_previous().then(|| href(1)),
            prev_href: page.has_previous().then(|| href(page.previous_number())),
            next_href: page.has_next().then(|| href(page.next_number())),
            last_href: page.has_next().then(|| href(page.num_pages())),
        }
    }
}

/// Encode non-empty pairs as a query string.
#[must_use]
pub fn query_string(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Placeholder for a value whose record was deleted.
pub const MISSING: &str = "\u{2014}";

/// `?page=` on list pages.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// One `<option>` of a select box.
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    /// Options for `(value, label)` pairs, marking the one equal to `current`.
    pub fn list(
        choices: impl IntoIterator<Item = (String, String)>,
        current: Option<&str>,
    ) -> Vec<Self> {
        let current = current.map(str::trim);
        choices
            .into_iter()
            .map(|(value, label)| Self {
                selected: current == Some(value.as_str()),
                value,
                label,
            })
            .collect()
    }

    /// Options for every order status.
    pub fn statuses(current: Option<&str>) -> Vec<Self> {
        Self::list(
            OrderStatus::ALL.map(|s| (s.as_str().to_string(), s.as_str().to_string())),
            current,
        )
    }

    /// Options for every stock label.
    pub fn stock_labels(current: Option<&str>) -> Vec<Self> {
        Self::list(
            StockLabel::ALL.map(|s| (s.as_str().to_string(), s.as_str().to_string())),
            current,
        )
    }

    /// Options for the product choices.
    pub fn products(choices: &[ProductChoice], current: Option<&str>) -> Vec<Self> {
        Self::list(
            choices.iter().map(|c| (c.id.to_string(), c.name.clone())),
            current,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesbook_core::pagination::PageRequest;

    #[test]
    fn test_query_string_skips_empty_and_encodes() {
        assert_eq!(
            query_string(&[("q", "acme & co"), ("status", ""), ("page", "2")]),
            "q=acme%20%26%20co&page=2"
        );
    }

    #[test]
    fn test_pager_links() {
        let page = PageRequest::parse(Some("2"))
            .resolve(12, 5)
            .with_items(vec![(); 5]);
        let pager = Pager::new(&page, "page", &[("q", "acme")]);

        assert_eq!(pager.number, 2);
        assert_eq!(pager.num_pages, 3);
        assert_eq!(pager.first_href.as_deref(), Some("?q=acme&page=1"));
        assert_eq!(pager.prev_href.as_deref(), Some("?q=acme&page=1"));
        assert_eq!(pager.next_href.as_deref(), Some("?q=acme&page=3"));
        assert_eq!(pager.last_href.as_deref(), Some("?q=acme&page=3"));
    }

    #[test]
    fn test_select_options_mark_current() {
        let options = SelectOption::statuses(Some("Shipped"));
        assert_eq!(options.len(), 4);
        let selected: Vec<_> = options.iter().filter(|o| o.selected).map(|o| o.label.as_str()).collect();
        assert_eq!(selected, ["Shipped"]);

        assert!(SelectOption::stock_labels(None).iter().all(|o| !o.selected));
    }

    #[test]
    fn test_pager_single_page_has_no_links() {
        let page = PageRequest::FIRST.resolve(2, 5).with_items(vec![(); 2]);
        let pager = Pager::new(&page, "page", &[]);
        assert!(pager.prev_href.is_none());
        assert!(pager.next_href.is_none());
    }
}
