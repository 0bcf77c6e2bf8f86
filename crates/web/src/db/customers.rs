//! Customer repository.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use salesbook_core::filters::CustomerSearch;
use salesbook_core::pagination::{Page, PageRequest};
use salesbook_core::{CustomerId, Email, ProfileId};

use super::{RepositoryError, row_count};
use crate::models::{Customer, CustomerInput, CustomerStats};

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: i32,
    profile_id: Option<i32>,
    name: String,
    join_date: NaiveDate,
    phone: String,
    email: String,
    address: String,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: CustomerId::new(row.id),
            owner: row.profile_id.map(ProfileId::new),
            name: row.name,
            join_date: row.join_date,
            phone: row.phone,
            email,
            address: row.address,
        })
    }
}

#[derive(sqlx::FromRow)]
struct StatsRow {
    total_sales: Decimal,
    order_count: i64,
    closed: i64,
}

const CUSTOMER_COLUMNS: &str = "id, profile_id, name, join_date, phone, email, address";

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a customer by ID, regardless of owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM sales.customer WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Customer::try_from).transpose()
    }

    /// Create a customer owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        owner: ProfileId,
        input: &CustomerInput,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            r"
            INSERT INTO sales.customer (profile_id, name, phone, email, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CUSTOMER_COLUMNS}
            "
        ))
        .bind(owner)
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Overwrite a customer's contact fields. Ownership never changes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer does not exist.
    pub async fn update(
        &self,
        id: CustomerId,
        input: &CustomerInput,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            r"
            UPDATE sales.customer
            SET name = $2, phone = $3, email = $4, address = $5
            WHERE id = $1
            RETURNING {CUSTOMER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a customer. Its orders remain with a null customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer does not exist.
    pub async fn delete(&self, id: CustomerId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM sales.customer WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// One page of `owner`'s customers, optionally narrowed by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_page(
        &self,
        owner: ProfileId,
        search: &CustomerSearch,
        page: PageRequest,
        per_page: u32,
    ) -> Result<Page<Customer>, RepositoryError> {
        let pattern = search.pattern();

        let total: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM sales.customer
            WHERE profile_id = $1
              AND ($2::text IS NULL OR name ILIKE $2 ESCAPE '\')
            ",
        )
        .bind(owner)
        .bind(pattern.as_deref())
        .fetch_one(self.pool)
        .await?;

        let window = page.resolve(row_count(total), per_page);

        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            r"
            SELECT {CUSTOMER_COLUMNS}
            FROM sales.customer
            WHERE profile_id = $1
              AND ($2::text IS NULL OR name ILIKE $2 ESCAPE '\')
            ORDER BY id DESC
            LIMIT $3 OFFSET $4
            "
        ))
        .bind(owner)
        .bind(pattern.as_deref())
        .bind(window.limit())
        .bind(window.offset())
        .fetch_all(self.pool)
        .await?;

        let customers = rows
            .into_iter()
            .map(Customer::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(window.with_items(customers))
    }

    /// Order statistics for one customer. Orders whose product was deleted
    /// count toward the totals but contribute nothing to sales.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn order_stats(&self, id: CustomerId) -> Result<CustomerStats, RepositoryError> {
        let row = sqlx::query_as::<_, StatsRow>(
            r#"
            SELECT
                ROUND(COALESCE(SUM(o.quantity * p.price), 0), 2) AS total_sales,
                COUNT(o.id) AS order_count,
                COUNT(o.id) FILTER (WHERE o.status = 'Delivered') AS closed
            FROM sales."order" o
            LEFT JOIN sales.product p ON p.id = o.product_id
            WHERE o.customer_id = $1
            "#,
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(CustomerStats {
            total_sales: row.total_sales,
            order_count: row.order_count,
            closed: row.closed,
            in_progress: row.order_count - row.closed,
        })
    }
}
