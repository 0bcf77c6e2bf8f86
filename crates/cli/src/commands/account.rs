//! Account management commands.
//!
//! # Usage
//!
//! ```bash
//! SALES_ACCOUNT_PASSWORD=... sb-cli account create -u alice
//! sb-cli account delete -u alice
//! ```
//!
//! # Environment Variables
//!
//! - `SALES_DATABASE_URL` - `PostgreSQL` connection string
//! - `SALES_ACCOUNT_PASSWORD` - Password for `account create`; read from stdin when unset

use std::io::BufRead;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use salesbook_web::forms::RegisterForm;
use salesbook_web::services::{AuthError, AuthService};

use super::ConnectError;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Invalid account: {0}")]
    Invalid(String),

    #[error("Account already exists: {0}")]
    Exists(String),

    #[error("No account named: {0}")]
    Missing(String),

    #[error("Could not read password: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Auth(AuthError),
}

/// Create an account. The profile starts empty and is completed on first login.
///
/// # Errors
///
/// Returns `AccountError` if the username or password is rejected, the
/// username is taken, or the database is unreachable.
pub async fn create(username: &str) -> Result<(), AccountError> {
    let password = read_password()?;

    let form = RegisterForm {
        username: username.to_owned(),
        password1: password.expose_secret().to_owned(),
        password2: password.expose_secret().to_owned(),
    };
    let username = form
        .parse()
        .map_err(|errors| AccountError::Invalid(errors.summary()))?;

    let pool = super::connect().await?;
    let user = AuthService::new(&pool)
        .register(&username, password.expose_secret())
        .await
        .map_err(|e| match e {
            AuthError::UserAlreadyExists => AccountError::Exists(username.clone()),
            AuthError::WeakPassword(reason) => AccountError::Invalid(reason),
            other => AccountError::Auth(other),
        })?;

    tracing::info!(
        account_id = %user.account_id,
        profile_id = %user.profile_id,
        username = %user.username,
        "Account created"
    );
    Ok(())
}

/// Delete an account and its profile. The profile's customers are kept
/// without an owner.
///
/// # Errors
///
/// Returns `AccountError::Missing` if no such account exists.
pub async fn delete(username: &str) -> Result<(), AccountError> {
    let pool = super::connect().await?;

    AuthService::new(&pool)
        .delete(username)
        .await
        .map_err(|e| match e {
            AuthError::AccountNotFound(name) => AccountError::Missing(name),
            other => AccountError::Auth(other),
        })?;

    tracing::info!(username, "Account deleted");
    Ok(())
}

fn read_password() -> Result<SecretString, AccountError> {
    dotenvy::dotenv().ok();

    if let Ok(password) = std::env::var("SALES_ACCOUNT_PASSWORD") {
        return Ok(SecretString::from(password));
    }

    tracing::info!("Reading password from stdin...");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(SecretString::from(line.trim_end_matches(['\r', '\n']).to_owned()))
}
