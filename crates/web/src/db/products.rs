//! Product repository.
//!
//! Every write that sets inventory also sets the stock label from
//! [`StockLabel::for_inventory`], in the same statement.

use sqlx::PgPool;

use salesbook_core::filters::ProductFilter;
use salesbook_core::pagination::{Page, PageRequest};
use salesbook_core::{Price, ProductId, StockLabel};

use super::{RepositoryError, row_count};
use crate::models::{Product, ProductInput};

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    price: Price,
    inventory: i32,
    stock: StockLabel,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            price: row.price,
            inventory: row.inventory,
            stock: row.stock,
        }
    }
}

/// A product as offered in the order form's dropdown.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductChoice {
    pub id: ProductId,
    pub name: String,
}

const PRODUCT_COLUMNS: &str = "id, name, price, inventory, stock";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM sales.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// All products by name, for order form choices.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_choices(&self) -> Result<Vec<ProductChoice>, RepositoryError> {
        let choices = sqlx::query_as::<_, ProductChoice>(
            "SELECT id, name FROM sales.product ORDER BY name, id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(choices)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            INSERT INTO sales.product (name, price, inventory, stock)
            VALUES ($1, $2, $3, $4)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&input.name)
        .bind(input.price)
        .bind(input.inventory)
        .bind(input.stock())
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Overwrite a product, recomputing its stock label.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            UPDATE sales.product
            SET name = $2, price = $3, inventory = $4, stock = $5
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&input.name)
        .bind(input.price)
        .bind(input.inventory)
        .bind(input.stock())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a product. Orders that referenced it keep a null product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM sales.product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// One page of products matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_page(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
        per_page: u32,
    ) -> Result<Page<Product>, RepositoryError> {
        const FILTER: &str = r"
            ($1::text IS NULL OR name ILIKE $1 ESCAPE '\')
            AND ($2::text IS NULL OR stock = $2)
            AND ($3::numeric IS NULL OR price > $3)
            AND ($4::numeric IS NULL OR price < $4)
        ";

        let name = filter.name_pattern();

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM sales.product WHERE {FILTER}"
        ))
        .bind(name.as_deref())
        .bind(filter.stock)
        .bind(filter.price_gt)
        .bind(filter.price_lt)
        .fetch_one(self.pool)
        .await?;

        let window = page.resolve(row_count(total), per_page);

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM sales.product
            WHERE {FILTER}
            ORDER BY id DESC
            LIMIT $5 OFFSET $6
            "
        ))
        .bind(name.as_deref())
        .bind(filter.stock)
        .bind(filter.price_gt)
        .bind(filter.price_lt)
        .bind(window.limit())
        .bind(window.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(window.with_items(rows.into_iter().map(Into::into).collect()))
    }
}
