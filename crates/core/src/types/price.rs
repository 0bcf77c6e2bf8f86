//! Product price using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is empty.
    #[error("price is required")]
    Empty,
    /// The input is not a decimal number.
    #[error("enter a number")]
    NotANumber,
    /// The value is below the minimum.
    #[error("ensure this value is greater than or equal to 0.01")]
    BelowMinimum,
    /// More than two digits after the decimal point.
    #[error("ensure that there are no more than 2 decimal places")]
    TooManyDecimalPlaces,
    /// More than ten digits in total.
    #[error("ensure that there are no more than 10 digits in total")]
    TooManyDigits,
}

/// A unit price, as stored in a `NUMERIC(10, 2)` column.
///
/// ## Constraints
///
/// - At least 0.01
/// - At most two decimal places
/// - At most ten digits in total
///
/// ```
/// use rust_decimal::Decimal;
/// use salesbook_core::Price;
///
/// let price = Price::parse("9.99").unwrap();
/// assert_eq!(price.times(3), Decimal::new(2997, 2));
/// assert!(Price::parse("0").is_err());
/// assert!(Price::parse("1.999").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Smallest allowed price.
    pub const MIN: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

    const MAX_SCALE: u32 = 2;
    const MAX_DIGITS: usize = 10;

    /// Parse a price from form input.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, not a decimal number,
    /// or violates one of the constraints above.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PriceError::Empty);
        }
        let amount = s.parse::<Decimal>().map_err(|_| PriceError::NotANumber)?;
        Self::new(amount)
    }

    /// Validate an already-decimal amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount violates one of the constraints above.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        // Scale is checked as written: "1.230" has three decimal places
        let written_scale = amount.scale();
        let amount = amount.normalize();
        if amount < Self::MIN {
            return Err(PriceError::BelowMinimum);
        }
        if written_scale > Self::MAX_SCALE {
            return Err(PriceError::TooManyDecimalPlaces);
        }
        let integer_digits = amount.trunc().abs().to_string().len();
        if integer_digits + Self::MAX_SCALE as usize > Self::MAX_DIGITS {
            return Err(PriceError::TooManyDigits);
        }
        Ok(Self(amount))
    }

    /// Returns the amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Total for `quantity` units.
    #[must_use]
    pub fn times(&self, quantity: i32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl std::str::FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        // The column check constraint guarantees the minimum
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Price::parse("0.01").unwrap().amount(), Price::MIN);
        assert_eq!(Price::parse(" 12.5 ").unwrap().to_string(), "12.50");
        assert_eq!(Price::parse("10.00").unwrap().amount(), Decimal::from(10));
        assert!(Price::parse("99999999.99").is_ok());
    }

    #[test]
    fn test_parse_rejects_minimum_violations() {
        assert_eq!(Price::parse("0"), Err(PriceError::BelowMinimum));
        assert_eq!(Price::parse("0.009"), Err(PriceError::BelowMinimum));
        assert_eq!(Price::parse("-4"), Err(PriceError::BelowMinimum));
    }

    #[test]
    fn test_parse_rejects_precision() {
        assert_eq!(Price::parse("1.234"), Err(PriceError::TooManyDecimalPlaces));
        assert_eq!(Price::parse("123456789"), Err(PriceError::TooManyDigits));
    }

    #[test]
    fn test_parse_counts_trailing_zero_places() {
        assert_eq!(Price::parse("1.230"), Err(PriceError::TooManyDecimalPlaces));
        assert_eq!(Price::parse("5.000"), Err(PriceError::TooManyDecimalPlaces));
        assert_eq!(Price::parse("1.23").unwrap().to_string(), "1.23");
        assert_eq!(Price::parse("1.20").unwrap().to_string(), "1.20");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Price::parse(""), Err(PriceError::Empty));
        assert_eq!(Price::parse("ten"), Err(PriceError::NotANumber));
    }

    #[test]
    fn test_times() {
        let price = Price::parse("2.50").unwrap();
        assert_eq!(price.times(4), Decimal::from(10));
        assert_eq!(price.times(0), Decimal::ZERO);
    }

    #[test]
    fn test_serializes_as_string() {
        let price = Price::parse("3.75").unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"3.75\"");
    }
}
