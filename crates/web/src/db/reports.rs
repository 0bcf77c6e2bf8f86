//! Aggregate queries behind the `/data` endpoint.
//!
//! All three series are scoped to the requesting profile's customers and
//! skip orders whose product or customer has been deleted.

use sqlx::PgPool;

use salesbook_core::ProfileId;
use salesbook_core::reports::{
    CustomerSales, DailySales, ProductQuantity, RECENT_DAYS, SalesReport, most_recent,
};

use super::RepositoryError;

/// Repository for sales report queries.
pub struct ReportRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportRepository<'a> {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Build the full sales report for `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn sales_report(&self, owner: ProfileId) -> Result<SalesReport, RepositoryError> {
        let daily = sqlx::query_as::<_, DailySales>(
            r#"
            SELECT o.order_date AS date,
                   ROUND(SUM(o.quantity * p.price), 2) AS daily_sales
            FROM sales."order" o
            JOIN sales.product p ON p.id = o.product_id
            JOIN sales.customer c ON c.id = o.customer_id
            WHERE c.profile_id = $1
            GROUP BY o.order_date
            ORDER BY o.order_date
            "#,
        )
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        let by_customer = sqlx::query_as::<_, CustomerSales>(
            r#"
            SELECT c.name AS customer_name,
                   ROUND(SUM(o.quantity * p.price), 2) AS sales_sum
            FROM sales."order" o
            JOIN sales.product p ON p.id = o.product_id
            JOIN sales.customer c ON c.id = o.customer_id
            WHERE c.profile_id = $1
            GROUP BY c.id, c.name
            ORDER BY c.id DESC
            "#,
        )
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        let by_product = sqlx::query_as::<_, ProductQuantity>(
            r#"
            SELECT p.name AS product_name,
                   SUM(o.quantity)::bigint AS quantity_sum
            FROM sales."order" o
            JOIN sales.product p ON p.id = o.product_id
            JOIN sales.customer c ON c.id = o.customer_id
            WHERE c.profile_id = $1
            GROUP BY p.id, p.name
            ORDER BY p.id
            "#,
        )
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        Ok(SalesReport {
            data_1: most_recent(daily, RECENT_DAYS),
            data_2: by_customer,
            data_3: by_product,
        })
    }
}
