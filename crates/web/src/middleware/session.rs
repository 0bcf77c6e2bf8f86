//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions. The store
//! table lives in the `sales` schema next to the application tables.

use sqlx::PgPool;
use thiserror::Error;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::SalesConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "salesbook_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// The session store rejected its schema or table name.
#[derive(Debug, Error)]
#[error("invalid session store: {0}")]
pub struct SessionStoreError(String);

/// Create the session layer with `PostgreSQL` store.
///
/// The `sales.session` table is created by the web migrations.
///
/// # Errors
///
/// Returns `SessionStoreError` if the store's schema or table name is rejected.
pub fn create_session_layer(
    pool: &PgPool,
    config: &SalesConfig,
) -> Result<SessionManagerLayer<PostgresStore>, SessionStoreError> {
    let store = PostgresStore::new(pool.clone())
        .with_schema_name("sales")
        .map_err(|e| SessionStoreError(e.to_string()))?
        .with_table_name("session")
        .map_err(|e| SessionStoreError(e.to_string()))?;

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/"))
}
