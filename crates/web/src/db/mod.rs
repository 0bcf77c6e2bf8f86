//! Database operations for the `sales` schema.
//!
//! ## Tables
//!
//! - `account` - Login credentials
//! - `profile` - One per account, owns customers
//! - `customer` - Customer records (`profile_id` nulled when the profile goes)
//! - `product` - Catalog with inventory and derived stock label
//! - `order` - Order lines (`customer_id`/`product_id` nulled on delete)
//! - `session` - tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p salesbook-cli -- migrate
//! ```
//!
//! Queries are built at runtime with `sqlx::query_as` into private row
//! types, then converted into [`crate::models`] types at this boundary.

pub mod accounts;
pub mod customers;
pub mod orders;
pub mod products;
pub mod profiles;
pub mod reports;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use accounts::{AccountCredentials, AccountRepository};
pub use customers::CustomerRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use profiles::ProfileRepository;
pub use reports::ReportRepository;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// An order asked for more units than the product has.
    #[error("insufficient inventory for {product}: {available} available")]
    InsufficientInventory {
        /// Product name.
        product: String,
        /// Units on hand when the order was attempted.
        available: i32,
    },
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique violation to `Conflict`, everything else to `Database`.
fn unique_violation(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

/// Total row count from `COUNT(*)`, as the page resolver wants it.
fn row_count(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}
