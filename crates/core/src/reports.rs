//! Aggregate sales report shapes.
//!
//! The dashboard charts are fed from `/data`, which returns a
//! [`SalesReport`]. Field names are part of the JSON contract.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of most recent days plotted on the dashboard.
pub const RECENT_DAYS: usize = 10;

/// Revenue for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct DailySales {
    pub date: NaiveDate,
    pub daily_sales: Decimal,
}

/// Revenue attributed to one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct CustomerSales {
    pub customer_name: String,
    pub sales_sum: Decimal,
}

/// Units sold of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct ProductQuantity {
    pub product_name: String,
    pub quantity_sum: i64,
}

/// The `/data` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesReport {
    pub data_1: Vec<DailySales>,
    pub data_2: Vec<CustomerSales>,
    pub data_3: Vec<ProductQuantity>,
}

/// Keep the last `n` buckets of an ascending-by-date series.
#[must_use]
pub fn most_recent(mut days: Vec<DailySales>, n: usize) -> Vec<DailySales> {
    let excess = days.len().saturating_sub(n);
    days.drain(..excess);
    days
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn day(n: u32, cents: i64) -> DailySales {
        DailySales {
            date: NaiveDate::from_ymd_opt(2024, 1, n).unwrap(),
            daily_sales: Decimal::new(cents, 2),
        }
    }

    #[test]
    fn test_most_recent_keeps_tail() {
        let days: Vec<_> = (1..=12).map(|n| day(n, 100)).collect();
        let recent = most_recent(days, RECENT_DAYS);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent.first().unwrap().date.to_string(), "2024-01-03");
        assert_eq!(recent.last().unwrap().date.to_string(), "2024-01-12");
    }

    #[test]
    fn test_most_recent_short_series_untouched() {
        let days = vec![day(1, 5), day(2, 7)];
        assert_eq!(most_recent(days.clone(), RECENT_DAYS), days);
    }

    #[test]
    fn test_report_json_shape() {
        let report = SalesReport {
            data_1: vec![day(5, 2997)],
            data_2: vec![CustomerSales {
                customer_name: "Acme".to_owned(),
                sales_sum: Decimal::new(2997, 2),
            }],
            data_3: vec![ProductQuantity {
                product_name: "Widget".to_owned(),
                quantity_sum: 3,
            }],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "data_1": [{"date": "2024-01-05", "daily_sales": "29.97"}],
                "data_2": [{"customer_name": "Acme", "sales_sum": "29.97"}],
                "data_3": [{"product_name": "Widget", "quantity_sum": 3}]
            })
        );
    }
}
