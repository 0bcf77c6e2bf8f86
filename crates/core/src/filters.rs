//! Listing filters for orders, products and the dashboard search box.
//!
//! Filters arrive as raw query-string values. Empty values mean "no filter";
//! values that do not parse are reported back as [`FilterError`]s and the
//! corresponding predicate is dropped, so the listing still renders.
//!
//! All predicates combine conjunctively. `matches` is the in-memory form of
//! the same predicates the repositories express in SQL.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{OrderStatus, ProductId, StockLabel};

/// A query value that could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterError {
    pub field: &'static str,
    pub message: String,
}

impl FilterError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Treat absent and blank values the same.
fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn parse_field<T: std::str::FromStr>(
    field: &'static str,
    value: Option<&String>,
    message: &str,
    errors: &mut Vec<FilterError>,
) -> Option<T> {
    let raw = non_blank(value)?;
    match raw.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.push(FilterError::new(field, message));
            None
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Raw order filter query (`?product=&status=&start_date=&end_date=`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OrderFilterQuery {
    pub product: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Filter over a customer's orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub product: Option<ProductId>,
    pub status: Option<OrderStatus>,
    /// Strictly after this date.
    pub start_date: Option<NaiveDate>,
    /// Strictly before this date.
    pub end_date: Option<NaiveDate>,
}

impl OrderFilter {
    /// Build a filter from query values, collecting unusable ones.
    #[must_use]
    pub fn from_query(query: &OrderFilterQuery) -> (Self, Vec<FilterError>) {
        let mut errors = Vec::new();
        let product = parse_field::<i32>(
            "product",
            query.product.as_ref(),
            "Select a valid choice.",
            &mut errors,
        )
        .map(ProductId::new);
        let status = parse_field(
            "status",
            query.status.as_ref(),
            "Select a valid choice.",
            &mut errors,
        );
        let start_date = parse_field(
            "start_date",
            query.start_date.as_ref(),
            "Enter a valid date.",
            &mut errors,
        );
        let end_date = parse_field(
            "end_date",
            query.end_date.as_ref(),
            "Enter a valid date.",
            &mut errors,
        );
        (
            Self {
                product,
                status,
                start_date,
                end_date,
            },
            errors,
        )
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.product.is_none()
            && self.status.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    /// Whether an order with these attributes passes the filter. An order
    /// whose product was deleted never matches a product filter.
    #[must_use]
    pub fn matches(
        &self,
        product: Option<ProductId>,
        status: OrderStatus,
        order_date: NaiveDate,
    ) -> bool {
        self.product.is_none_or(|wanted| product == Some(wanted))
            && self.status.is_none_or(|wanted| status == wanted)
            && self.start_date.is_none_or(|start| order_date > start)
            && self.end_date.is_none_or(|end| order_date < end)
    }
}

// =============================================================================
// Products
// =============================================================================

/// Raw product filter query (`?name=&stock=&price__gt=&price__lt=`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProductFilterQuery {
    pub name: Option<String>,
    pub stock: Option<String>,
    #[serde(rename = "price__gt")]
    pub price_gt: Option<String>,
    #[serde(rename = "price__lt")]
    pub price_lt: Option<String>,
}

/// Filter over the product catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    pub stock: Option<StockLabel>,
    /// Strictly greater than.
    pub price_gt: Option<Decimal>,
    /// Strictly less than.
    pub price_lt: Option<Decimal>,
}

impl ProductFilter {
    /// Build a filter from query values, collecting unusable ones.
    #[must_use]
    pub fn from_query(query: &ProductFilterQuery) -> (Self, Vec<FilterError>) {
        let mut errors = Vec::new();
        let name = non_blank(query.name.as_ref()).map(str::to_owned);
        let stock = parse_field(
            "stock",
            query.stock.as_ref(),
            "Select a valid choice.",
            &mut errors,
        );
        let price_gt = parse_field(
            "price__gt",
            query.price_gt.as_ref(),
            "Enter a number.",
            &mut errors,
        );
        let price_lt = parse_field(
            "price__lt",
            query.price_lt.as_ref(),
            "Enter a number.",
            &mut errors,
        );
        (
            Self {
                name,
                stock,
                price_gt,
                price_lt,
            },
            errors,
        )
    }

    /// `ILIKE` pattern for the name predicate, with wildcards escaped.
    #[must_use]
    pub fn name_pattern(&self) -> Option<String> {
        self.name.as_deref().map(like_pattern)
    }

    #[must_use]
    pub fn matches(&self, name: &str, stock: StockLabel, price: Decimal) -> bool {
        self.name
            .as_deref()
            .is_none_or(|needle| contains_ignore_case(name, needle))
            && self.stock.is_none_or(|wanted| stock == wanted)
            && self.price_gt.is_none_or(|bound| price > bound)
            && self.price_lt.is_none_or(|bound| price < bound)
    }
}

// =============================================================================
// Dashboard search
// =============================================================================

/// The dashboard `q` box: case-insensitive substring of the customer name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerSearch(Option<String>);

impl CustomerSearch {
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        Self(
            raw.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
        )
    }

    /// The search text as typed, for echoing back into the form.
    #[must_use]
    pub fn term(&self) -> Option<&str> {
        self.0.as_deref()
    }

    #[must_use]
    pub fn pattern(&self) -> Option<String> {
        self.0.as_deref().map(like_pattern)
    }

    #[must_use]
    pub fn matches(&self, customer_name: &str) -> bool {
        self.0
            .as_deref()
            .is_none_or(|needle| contains_ignore_case(customer_name, needle))
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// `%term%` with `\`, `%` and `_` escaped for `ILIKE ... ESCAPE '\'`.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
