//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;
use std::str::FromStr;

use rust_decimal::Decimal;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Format a decimal amount as dollars with two places.
///
/// Usage in templates: `{{ stats.total_sales|money }}`
#[askama::filter_fn]
pub fn money(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = value.to_string();
    Ok(Decimal::from_str(&raw).map_or(raw, format_money))
}

/// `$12.50` style rendering of an amount.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    format!("${amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(Decimal::new(2997, 2)), "$29.97");
        assert_eq!(format_money(Decimal::from(3)), "$3.00");
        assert_eq!(format_money(Decimal::new(5, 1)), "$0.50");
    }
}
