//! Order repository.
//!
//! Creating and deleting orders moves product inventory. Both happen inside
//! one transaction together with the order write: the decrement is a
//! conditional `UPDATE ... WHERE inventory >= quantity`, so two concurrent
//! orders can never both take the last unit.

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};

use salesbook_core::filters::OrderFilter;
use salesbook_core::pagination::{Page, PageRequest};
use salesbook_core::{CustomerId, OrderId, OrderStatus, Price, ProductId, ProfileId, StockLabel};

use super::{RepositoryError, row_count};
use crate::models::{Order, OrderLine, ProductRef};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    customer_id: Option<i32>,
    customer_name: Option<String>,
    product_id: Option<i32>,
    product_name: Option<String>,
    product_price: Option<Price>,
    quantity: i32,
    status: OrderStatus,
    order_date: NaiveDate,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        let product = match (row.product_id, row.product_name, row.product_price) {
            (Some(id), Some(name), Some(price)) => Some(ProductRef {
                id: ProductId::new(id),
                name,
                price,
            }),
            _ => None,
        };

        Self {
            id: OrderId::new(row.id),
            customer_id: row.customer_id.map(CustomerId::new),
            customer_name: row.customer_name,
            product,
            quantity: row.quantity,
            status: row.status,
            order_date: row.order_date,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DeletedRow {
    product_id: Option<i32>,
    quantity: i32,
}

#[derive(sqlx::FromRow)]
struct StockRow {
    name: String,
    inventory: i32,
}

const ORDER_SELECT: &str = r#"
    SELECT o.id, o.customer_id, c.name AS customer_name,
           o.product_id, p.name AS product_name, p.price AS product_price,
           o.quantity, o.status, o.order_date
    FROM sales."order" o
    LEFT JOIN sales.customer c ON c.id = o.customer_id
    LEFT JOIN sales.product p ON p.id = o.product_id
"#;

const CUSTOMER_FILTER: &str = r"
    o.customer_id = $1
    AND ($2::int IS NULL OR o.product_id = $2)
    AND ($3::text IS NULL OR o.status = $3)
    AND ($4::date IS NULL OR o.order_date > $4)
    AND ($5::date IS NULL OR o.order_date < $5)
";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("{ORDER_SELECT} WHERE o.id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Create several orders for one customer, all or nothing.
    ///
    /// Each line takes its quantity out of the product's inventory. If any
    /// line asks for more than is on hand the whole batch is rolled back.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InsufficientInventory` if a line cannot be
    /// covered, `RepositoryError::NotFound` if a product does not exist.
    pub async fn create_many(
        &self,
        customer: CustomerId,
        lines: &[OrderLine],
    ) -> Result<Vec<OrderId>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(lines.len());

        for line in lines {
            take_inventory(&mut tx, line.product, line.quantity).await?;

            let id: i32 = sqlx::query_scalar(
                r#"
                INSERT INTO sales."order" (customer_id, product_id, quantity, status)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(customer)
            .bind(line.product)
            .bind(line.quantity)
            .bind(line.status)
            .fetch_one(&mut *tx)
            .await?;

            created.push(OrderId::new(id));
        }

        tx.commit().await?;

        tracing::info!(
            customer_id = %customer,
            orders = created.len(),
            "orders created"
        );
        Ok(created)
    }

    /// Change an order's status. Product and quantity are fixed at creation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(r#"UPDATE sales."order" SET status = $2 WHERE id = $1"#)
            .bind(id)
            .bind(status)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete an order and return its quantity to the product, if the
    /// product still exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query_as::<_, DeletedRow>(
            r#"DELETE FROM sales."order" WHERE id = $1 RETURNING product_id, quantity"#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if let Some(product_id) = deleted.product_id {
            restore_inventory(&mut tx, ProductId::new(product_id), deleted.quantity).await?;
        }

        tx.commit().await?;

        tracing::info!(order_id = %id, "order deleted");
        Ok(())
    }

    /// One page of a customer's orders matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_customer(
        &self,
        customer: CustomerId,
        filter: &OrderFilter,
        page: PageRequest,
        per_page: u32,
    ) -> Result<Page<Order>, RepositoryError> {
        let total: i64 = sqlx::query_scalar(&format!(
            r#"SELECT COUNT(*) FROM sales."order" o WHERE {CUSTOMER_FILTER}"#
        ))
        .bind(customer)
        .bind(filter.product)
        .bind(filter.status)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_one(self.pool)
        .await?;

        let window = page.resolve(row_count(total), per_page);

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            {ORDER_SELECT}
            WHERE {CUSTOMER_FILTER}
            ORDER BY o.id DESC
            LIMIT $6 OFFSET $7
            "
        ))
        .bind(customer)
        .bind(filter.product)
        .bind(filter.status)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(window.limit())
        .bind(window.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(window.with_items(rows.into_iter().map(Into::into).collect()))
    }

    /// One page of the most recent orders across `owner`'s customers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn recent_for_owner(
        &self,
        owner: ProfileId,
        page: PageRequest,
        per_page: u32,
    ) -> Result<Page<Order>, RepositoryError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM sales."order" o
            JOIN sales.customer c ON c.id = o.customer_id
            WHERE c.profile_id = $1
            "#,
        )
        .bind(owner)
        .fetch_one(self.pool)
        .await?;

        let window = page.resolve(row_count(total), per_page);

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            {ORDER_SELECT}
            WHERE c.profile_id = $1
            ORDER BY o.id DESC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(owner)
        .bind(window.limit())
        .bind(window.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(window.with_items(rows.into_iter().map(Into::into).collect()))
    }
}

/// Take `quantity` units from a product, refusing to go below zero.
async fn take_inventory(
    tx: &mut Transaction<'_, Postgres>,
    product: ProductId,
    quantity: i32,
) -> Result<(), RepositoryError> {
    let remaining: Option<i32> = sqlx::query_scalar(
        r"
        UPDATE sales.product
        SET inventory = inventory - $2
        WHERE id = $1 AND inventory >= $2
        RETURNING inventory
        ",
    )
    .bind(product)
    .bind(quantity)
    .fetch_optional(&mut **tx)
    .await?;

    let Some(remaining) = remaining else {
        let stock = sqlx::query_as::<_, StockRow>(
            "SELECT name, inventory FROM sales.product WHERE id = $1",
        )
        .bind(product)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        tracing::warn!(
            product_id = %product,
            requested = quantity,
            available = stock.inventory,
            "order exceeds inventory"
        );
        return Err(RepositoryError::InsufficientInventory {
            product: stock.name,
            available: stock.inventory,
        });
    };

    set_stock(tx, product, remaining).await
}

/// Return `quantity` units to a product, if it still exists. The count
/// saturates at `INTEGER` max.
async fn restore_inventory(
    tx: &mut Transaction<'_, Postgres>,
    product: ProductId,
    quantity: i32,
) -> Result<(), RepositoryError> {
    let inventory: Option<i32> = sqlx::query_scalar(
        r"
        UPDATE sales.product
        SET inventory = LEAST(inventory::bigint + $2, 2147483647)::integer
        WHERE id = $1
        RETURNING inventory
        ",
    )
    .bind(product)
    .bind(quantity)
    .fetch_optional(&mut **tx)
    .await?;

    match inventory {
        Some(inventory) => set_stock(tx, product, inventory).await,
        None => Ok(()),
    }
}

/// Rewrite the stock label to match a freshly written inventory count.
async fn set_stock(
    tx: &mut Transaction<'_, Postgres>,
    product: ProductId,
    inventory: i32,
) -> Result<(), RepositoryError> {
    sqlx::query("UPDATE sales.product SET stock = $2 WHERE id = $1")
        .bind(product)
        .bind(StockLabel::for_inventory(inventory))
        .execute(&mut **tx)
        .await?;
    Ok(())
}
