//! Customer model.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use salesbook_core::{CustomerId, Email, Owned, ProfileId};

/// A customer record, owned by the profile that created it.
#[derive(Debug, Clone)]
pub struct Customer {
    pub id: CustomerId,
    /// `None` once the owning profile has been deleted.
    pub owner: Option<ProfileId>,
    pub name: String,
    pub join_date: NaiveDate,
    pub phone: String,
    pub email: Email,
    pub address: String,
}

impl Owned for Customer {
    fn owner(&self) -> Option<ProfileId> {
        self.owner
    }
}

/// Validated customer form data.
#[derive(Debug, Clone)]
pub struct CustomerInput {
    pub name: String,
    pub phone: String,
    pub email: Email,
    pub address: String,
}

/// Order statistics shown on the customer detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerStats {
    /// Sum of quantity x current price over orders whose product still exists.
    pub total_sales: Decimal,
    pub order_count: i64,
    /// Delivered orders.
    pub closed: i64,
    /// Everything not yet delivered.
    pub in_progress: i64,
}
