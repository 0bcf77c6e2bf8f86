//! Authentication service.
//!
//! Username and password accounts, hashed with Argon2id. Registering an
//! account also creates its empty profile.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use crate::db::{AccountRepository, RepositoryError};
use crate::models::CurrentUser;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
pub struct AuthService<'a> {
    accounts: AccountRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
        }
    }

    /// Register a new account with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the username is taken.
    pub async fn register(&self, username: &str, password: &str) -> Result<CurrentUser, AuthError> {
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let (account_id, profile_id) = self
            .accounts
            .create_with_profile(username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(CurrentUser {
            account_id,
            profile_id,
            username: username.to_owned(),
        })
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<CurrentUser, AuthError> {
        let credentials = self
            .accounts
            .get_credentials(username.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &credentials.password_hash)?;

        Ok(CurrentUser {
            account_id: credentials.account_id,
            profile_id: credentials.profile_id,
            username: credentials.username,
        })
    }

    /// Delete an account by username.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AccountNotFound` if no such account exists.
    pub async fn delete(&self, username: &str) -> Result<(), AuthError> {
        self.accounts
            .delete(username)
            .await
            .map_err(|e| deletion_error(username, e))
    }
}

fn deletion_error(username: &str, error: RepositoryError) -> AuthError {
    match error {
        RepositoryError::NotFound => AuthError::AccountNotFound(username.to_owned()),
        other => AuthError::Repository(other),
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Validate password meets requirements.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` if the password is too short.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password() {
        assert!(validate_password("12345678").is_ok());
        assert!(matches!(
            validate_password("1234567"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_deleting_unknown_account_names_it() {
        let err = deletion_error("ghost", RepositoryError::NotFound);
        assert!(matches!(&err, AuthError::AccountNotFound(name) if name == "ghost"));
        assert_eq!(err.to_string(), "no account named ghost");

        assert!(matches!(
            deletion_error("ghost", RepositoryError::Conflict("account".to_string())),
            AuthError::Repository(_)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-hash"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
