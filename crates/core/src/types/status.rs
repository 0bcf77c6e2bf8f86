//! Status labels for products and orders.
//!
//! Both enums are stored as their display strings in `TEXT` columns, so the
//! database holds exactly what the UI shows.

use serde::{Deserialize, Serialize};

/// Error returned when a status string is not one of the known labels.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct StatusParseError {
    kind: &'static str,
    value: String,
}

/// Derived stock label for a product.
///
/// Never set directly; always computed from inventory with
/// [`StockLabel::for_inventory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockLabel {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl StockLabel {
    /// All labels, in the order filter dropdowns list them.
    pub const ALL: [Self; 2] = [Self::InStock, Self::OutOfStock];

    /// Label for a given inventory count: in stock iff at least one unit.
    #[must_use]
    pub const fn for_inventory(inventory: i32) -> Self {
        if inventory >= 1 {
            Self::InStock
        } else {
            Self::OutOfStock
        }
    }

    /// The stored and displayed form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::OutOfStock => "Out of Stock",
        }
    }
}

impl std::fmt::Display for StockLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StockLabel {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "In Stock" => Ok(Self::InStock),
            "Out of Stock" => Ok(Self::OutOfStock),
            _ => Err(StatusParseError {
                kind: "stock label",
                value: s.to_owned(),
            }),
        }
    }
}

/// Fulfillment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
}

impl OrderStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Confirmed,
        Self::Shipped,
        Self::Delivered,
    ];

    /// The stored and displayed form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
        }
    }

    /// Delivered orders count as closed; everything else is in progress.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| StatusParseError {
                kind: "order status",
                value: s.to_owned(),
            })
    }
}

// Both labels live in TEXT columns.
#[cfg(feature = "postgres")]
macro_rules! text_column {
    ($ty:ty) => {
        impl sqlx::Type<sqlx::Postgres> for $ty {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $ty {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
                Ok(s.parse()?)
            }
        }

        impl sqlx::Encode<'_, sqlx::Postgres> for $ty {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }
    };
}

#[cfg(feature = "postgres")]
text_column!(StockLabel);
#[cfg(feature = "postgres")]
text_column!(OrderStatus);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_label_threshold() {
        assert_eq!(StockLabel::for_inventory(1), StockLabel::InStock);
        assert_eq!(StockLabel::for_inventory(250), StockLabel::InStock);
        assert_eq!(StockLabel::for_inventory(0), StockLabel::OutOfStock);
        assert_eq!(StockLabel::for_inventory(-3), StockLabel::OutOfStock);
    }

    #[test]
    fn test_stock_label_strings() {
        assert_eq!(StockLabel::InStock.to_string(), "In Stock");
        assert_eq!(
            "Out of Stock".parse::<StockLabel>().unwrap(),
            StockLabel::OutOfStock
        );
        assert!("in stock".parse::<StockLabel>().is_err());
    }

    #[test]
    fn test_stock_label_serializes_as_display() {
        let json = serde_json::to_string(&StockLabel::OutOfStock).unwrap();
        assert_eq!(json, "\"Out of Stock\"");
    }

    #[test]
    fn test_order_status_parse() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        let err = "Lost".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err.to_string(), "invalid order status: Lost");
    }

    #[test]
    fn test_only_delivered_is_closed() {
        let closed: Vec<_> = OrderStatus::ALL
            .into_iter()
            .filter(OrderStatus::is_closed)
            .collect();
        assert_eq!(closed, vec![OrderStatus::Delivered]);
    }
}
