//! Product model.

use salesbook_core::{Price, ProductId, StockLabel};

/// A catalog product.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub inventory: i32,
    /// Always `StockLabel::for_inventory(inventory)`; maintained by the
    /// repository on every write.
    pub stock: StockLabel,
}

/// Validated product form data. The stock label is derived, never input.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub price: Price,
    pub inventory: i32,
}

impl ProductInput {
    #[must_use]
    pub const fn stock(&self) -> StockLabel {
        StockLabel::for_inventory(self.inventory)
    }
}
