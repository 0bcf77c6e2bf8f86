//! Order model.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use salesbook_core::{CustomerId, OrderId, OrderStatus, Price, ProductId};

/// The parts of a product an order listing needs.
#[derive(Debug, Clone)]
pub struct ProductRef {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
}

/// An order line.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: Option<CustomerId>,
    /// Customer name, for the dashboard's recent orders table.
    pub customer_name: Option<String>,
    /// `None` once the product has been deleted.
    pub product: Option<ProductRef>,
    pub quantity: i32,
    pub status: OrderStatus,
    pub order_date: NaiveDate,
}

impl Order {
    /// Quantity times the product's current price; `None` without a product.
    #[must_use]
    pub fn total_price(&self) -> Option<Decimal> {
        self.product
            .as_ref()
            .map(|product| product.price.times(self.quantity))
    }

    /// "Product - quantity", as used in flash messages.
    #[must_use]
    pub fn label(&self) -> String {
        let product = self
            .product
            .as_ref()
            .map_or("(deleted product)", |product| product.name.as_str());
        format!("{product} - {}", self.quantity)
    }
}

/// One validated line of the new-order form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub product: ProductId,
    pub quantity: i32,
    pub status: OrderStatus,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn order(product: Option<ProductRef>) -> Order {
        Order {
            id: OrderId::new(1),
            customer_id: Some(CustomerId::new(2)),
            customer_name: Some("Acme".to_string()),
            product,
            quantity: 3,
            status: OrderStatus::Pending,
            order_date: NaiveDate::MIN,
        }
    }

    fn widget() -> ProductRef {
        ProductRef {
            id: ProductId::new(9),
            name: "Widget".to_string(),
            price: Price::parse("9.99").unwrap(),
        }
    }

    #[test]
    fn test_total_price() {
        assert_eq!(order(Some(widget())).total_price(), Some(Decimal::new(2997, 2)));
        assert_eq!(order(None).total_price(), None);
    }

    #[test]
    fn test_label() {
        assert_eq!(order(Some(widget())).label(), "Widget - 3");
        assert_eq!(order(None).label(), "(deleted product) - 3");
    }
}
