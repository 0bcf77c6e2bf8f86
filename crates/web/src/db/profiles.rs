//! Profile repository.

use chrono::NaiveDate;
use sqlx::PgPool;

use salesbook_core::{AccountId, ProfileId};

use super::RepositoryError;
use crate::models::{Profile, ProfileInput};

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: i32,
    account_id: i32,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    start_date: NaiveDate,
    phone: String,
    email: String,
    address: String,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: ProfileId::new(row.id),
            account_id: AccountId::new(row.account_id),
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            start_date: row.start_date,
            phone: row.phone,
            email: row.email,
            address: row.address,
        }
    }
}

const PROFILE_COLUMNS: &str =
    "id, account_id, username, first_name, last_name, start_date, phone, email, address";

/// Repository for profile database operations.
pub struct ProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProfileRepository<'a> {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a profile by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProfileId) -> Result<Option<Profile>, RepositoryError> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM sales.profile WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get the profile belonging to an account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_account(
        &self,
        account_id: AccountId,
    ) -> Result<Option<Profile>, RepositoryError> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM sales.profile WHERE account_id = $1"
        ))
        .bind(account_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Overwrite the editable profile fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the profile does not exist.
    pub async fn update(
        &self,
        id: ProfileId,
        input: &ProfileInput,
    ) -> Result<Profile, RepositoryError> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r"
            UPDATE sales.profile
            SET first_name = $2, last_name = $3, phone = $4, email = $5, address = $6
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }
}
