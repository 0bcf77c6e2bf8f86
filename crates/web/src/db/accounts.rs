//! Account repository: credentials plus the profile created alongside.

use sqlx::PgPool;

use salesbook_core::{AccountId, ProfileId};

use super::{RepositoryError, unique_violation};

/// Stored login data for an account.
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    pub account_id: AccountId,
    pub profile_id: ProfileId,
    pub username: String,
    pub password_hash: String,
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    account_id: i32,
    profile_id: i32,
    username: String,
    password_hash: String,
}

impl From<CredentialsRow> for AccountCredentials {
    fn from(row: CredentialsRow) -> Self {
        Self {
            account_id: AccountId::new(row.account_id),
            profile_id: ProfileId::new(row.profile_id),
            username: row.username,
            password_hash: row.password_hash,
        }
    }
}

/// Repository for account database operations.
pub struct AccountRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an account and its (empty) profile in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_profile(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(AccountId, ProfileId), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let account_id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO sales.account (username, password_hash)
            VALUES ($1, $2)
            RETURNING id
            ",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| unique_violation(e, "username"))?;

        let profile_id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO sales.profile (account_id, username)
            VALUES ($1, $2)
            RETURNING id
            ",
        )
        .bind(account_id)
        .bind(username)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(account_id, profile_id, "account created");
        Ok((AccountId::new(account_id), ProfileId::new(profile_id)))
    }

    /// Look up login data by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_credentials(
        &self,
        username: &str,
    ) -> Result<Option<AccountCredentials>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            r"
            SELECT a.id AS account_id, p.id AS profile_id, a.username, a.password_hash
            FROM sales.account a
            JOIN sales.profile p ON p.account_id = a.id
            WHERE a.username = $1
            ",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete an account. Its profile goes with it; the profile's customers
    /// stay behind without an owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such account exists.
    pub async fn delete(&self, username: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM sales.account WHERE username = $1")
            .bind(username)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
