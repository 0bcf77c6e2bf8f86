//! HTML form payloads and their validation.
//!
//! Every form keeps its fields as raw strings so a value that does not parse
//! becomes a message next to the field instead of a rejected request. Each
//! form's `parse` runs the `validator` rules and then converts into the typed
//! input the repositories take; nothing is written unless both succeed.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use salesbook_core::{Email, OrderStatus, Price, ProductId};

use crate::models::{
    Customer, CustomerInput, OrderLine, Product, ProductInput, Profile, ProfileInput,
};

/// Key for errors that belong to the whole form.
pub const NON_FIELD: &str = "__all__";

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A single message for one field.
    #[must_use]
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    /// Messages for `field`, empty if it is valid.
    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every message, prefixed with its field name, for flash display.
    #[must_use]
    pub fn summary(&self) -> String {
        self.0
            .iter()
            .flat_map(|(field, messages)| {
                messages.iter().map(move |message| {
                    if field == NON_FIELD {
                        message.clone()
                    } else {
                        format!("{field}: {message}")
                    }
                })
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = Self::new();
        for (field, field_errors) in errors.field_errors() {
            let field = if field == "__all__" { NON_FIELD } else { &*field };
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                out.add(field, message);
            }
        }
        out
    }
}

/// Run the derived `validator` rules.
fn validated<T: Validate>(form: &T) -> Result<(), FieldErrors> {
    form.validate().map_err(FieldErrors::from)
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

const REQUIRED: &str = "This field is required.";
const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

// =============================================================================
// Field rules
// =============================================================================

fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("required", REQUIRED));
    }
    Ok(())
}

fn username_chars(value: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if value.is_empty() || !value.chars().all(allowed) {
        return Err(invalid(
            "invalid_username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        ));
    }
    Ok(())
}

fn email_address(value: &str) -> Result<(), ValidationError> {
    Email::parse(value)
        .map(|_| ())
        .map_err(|_| invalid("invalid_email", "Enter a valid email address."))
}

fn price(value: &str) -> Result<(), ValidationError> {
    Price::parse(value).map(|_| ()).map_err(|e| {
        let mut error = ValidationError::new("invalid_price");
        let message = e.to_string();
        let mut chars = message.chars();
        let capitalized = chars
            .next()
            .map(|first| first.to_uppercase().chain(chars).collect::<String>())
            .unwrap_or_default();
        error.message = Some(Cow::Owned(format!("{capitalized}.")));
        error
    })
}

/// Largest stock count a product form accepts.
pub const MAX_INVENTORY: i32 = 1_000_000_000;

fn inventory_count(value: &str) -> Result<(), ValidationError> {
    match value.trim().parse::<i32>() {
        Ok(n) if n <= MAX_INVENTORY => Ok(()),
        Ok(_) => Err(invalid(
            "max_value",
            "Ensure this value is less than or equal to 1000000000.",
        )),
        Err(_) => Err(invalid("invalid_integer", "Enter a whole number.")),
    }
}

/// Blank is accepted here; whether the row needs a quantity is decided per row.
fn positive_quantity(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    match value.trim().parse::<i32>() {
        Ok(n) if n >= 1 => Ok(()),
        Ok(_) => Err(invalid(
            "min_value",
            "Ensure this value is greater than or equal to 1.",
        )),
        Err(_) => Err(invalid("invalid_integer", "Enter a whole number.")),
    }
}

fn order_status(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    value
        .parse::<OrderStatus>()
        .map(|_| ())
        .map_err(|_| invalid("invalid_choice", INVALID_CHOICE))
}

// =============================================================================
// Accounts
// =============================================================================

/// Registration form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterForm {
    #[validate(
        length(max = 150, message = "Ensure this value has at most 150 characters."),
        custom(function = "username_chars")
    )]
    pub username: String,
    #[validate(length(
        min = 8,
        message = "This password is too short. It must contain at least 8 characters."
    ))]
    pub password1: String,
    #[validate(must_match(other = "password1", message = "The two password fields didn't match."))]
    pub password2: String,
}

impl RegisterForm {
    /// Validate and return the trimmed username.
    ///
    /// # Errors
    ///
    /// Returns the field messages if any rule fails.
    pub fn parse(&self) -> Result<String, FieldErrors> {
        validated(self)?;
        Ok(self.username.trim().to_owned())
    }
}

/// Login form. Credentials are checked by the auth service, not here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

// =============================================================================
// Profiles and customers
// =============================================================================

/// Profile completion and update form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ProfileForm {
    #[validate(
        custom(function = "required"),
        length(max = 200, message = "Ensure this value has at most 200 characters.")
    )]
    pub first_name: String,
    #[validate(
        custom(function = "required"),
        length(max = 200, message = "Ensure this value has at most 200 characters.")
    )]
    pub last_name: String,
    #[validate(
        custom(function = "required"),
        length(max = 100, message = "Ensure this value has at most 100 characters.")
    )]
    pub phone: String,
    #[validate(
        custom(function = "email_address"),
        length(max = 200, message = "Ensure this value has at most 200 characters.")
    )]
    pub email: String,
    #[validate(
        custom(function = "required"),
        length(max = 300, message = "Ensure this value has at most 300 characters.")
    )]
    pub address: String,
}

impl ProfileForm {
    /// Validate and convert.
    ///
    /// # Errors
    ///
    /// Returns the field messages if any rule fails.
    pub fn parse(&self) -> Result<ProfileInput, FieldErrors> {
        validated(self)?;
        Ok(ProfileInput {
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            email: parse_email(&self.email)?,
            address: self.address.trim().to_owned(),
        })
    }
}

/// Customer create and update form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CustomerForm {
    #[validate(
        custom(function = "required"),
        length(max = 200, message = "Ensure this value has at most 200 characters.")
    )]
    pub name: String,
    #[validate(
        custom(function = "required"),
        length(max = 100, message = "Ensure this value has at most 100 characters.")
    )]
    pub phone: String,
    #[validate(
        custom(function = "email_address"),
        length(max = 200, message = "Ensure this value has at most 200 characters.")
    )]
    pub email: String,
    #[validate(
        custom(function = "required"),
        length(max = 300, message = "Ensure this value has at most 300 characters.")
    )]
    pub address: String,
}

impl CustomerForm {
    /// Validate and convert.
    ///
    /// # Errors
    ///
    /// Returns the field messages if any rule fails.
    pub fn parse(&self) -> Result<CustomerInput, FieldErrors> {
        validated(self)?;
        Ok(CustomerInput {
            name: self.name.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            email: parse_email(&self.email)?,
            address: self.address.trim().to_owned(),
        })
    }
}

impl From<&Profile> for ProfileForm {
    fn from(profile: &Profile) -> Self {
        Self {
            first_name: profile.first_name.clone().unwrap_or_default(),
            last_name: profile.last_name.clone().unwrap_or_default(),
            phone: profile.phone.clone(),
            email: profile.email.clone(),
            address: profile.address.clone(),
        }
    }
}

impl From<&Customer> for CustomerForm {
    fn from(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            email: customer.email.to_string(),
            address: customer.address.clone(),
        }
    }
}

fn parse_email(value: &str) -> Result<Email, FieldErrors> {
    Email::parse(value).map_err(|_| FieldErrors::single("email", "Enter a valid email address."))
}

// =============================================================================
// Products
// =============================================================================

/// Product create and update form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ProductForm {
    #[validate(
        custom(function = "required"),
        length(max = 100, message = "Ensure this value has at most 100 characters.")
    )]
    pub name: String,
    #[validate(custom(function = "price"))]
    pub price: String,
    #[validate(custom(function = "inventory_count"))]
    pub inventory: String,
}

impl ProductForm {
    /// Validate and convert.
    ///
    /// # Errors
    ///
    /// Returns the field messages if any rule fails.
    pub fn parse(&self) -> Result<ProductInput, FieldErrors> {
        validated(self)?;
        let price = Price::parse(&self.price)
            .map_err(|e| FieldErrors::single("price", e.to_string()))?;
        let inventory = self
            .inventory
            .trim()
            .parse()
            .map_err(|_| FieldErrors::single("inventory", "Enter a whole number."))?;
        Ok(ProductInput {
            name: self.name.trim().to_owned(),
            price,
            inventory,
        })
    }
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.to_string(),
            inventory: product.inventory.to_string(),
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Maximum number of lines on the new-order form.
pub const MAX_ORDER_LINES: usize = 3;

/// New-order form: up to three `product_N` / `quantity_N` / `status_N` rows.
///
/// Rows left completely blank are skipped.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct OrderLinesForm {
    pub product_0: String,
    #[validate(custom(function = "positive_quantity"))]
    pub quantity_0: Option<String>,
    #[validate(custom(function = "order_status"))]
    pub status_0: Option<String>,
    pub product_1: String,
    #[validate(custom(function = "positive_quantity"))]
    pub quantity_1: Option<String>,
    #[validate(custom(function = "order_status"))]
    pub status_1: Option<String>,
    pub product_2: String,
    #[validate(custom(function = "positive_quantity"))]
    pub quantity_2: Option<String>,
    #[validate(custom(function = "order_status"))]
    pub status_2: Option<String>,
}

/// One row of the new-order form, as typed.
#[derive(Debug, Clone, Copy)]
pub struct RawOrderLine<'a> {
    pub index: usize,
    pub product: &'a str,
    pub quantity: &'a str,
    pub status: &'a str,
}

impl RawOrderLine<'_> {
    fn is_blank(&self) -> bool {
        self.product.trim().is_empty() && self.quantity.trim().is_empty()
    }

    /// Form field name for this row.
    #[must_use]
    pub fn field(&self, name: &str) -> String {
        format!("{name}_{}", self.index)
    }
}

impl OrderLinesForm {
    /// Rows in display order.
    #[must_use]
    pub fn rows(&self) -> [RawOrderLine<'_>; MAX_ORDER_LINES] {
        fn text(value: &Option<String>) -> &str {
            value.as_deref().unwrap_or("")
        }
        [
            RawOrderLine {
                index: 0,
                product: &self.product_0,
                quantity: text(&self.quantity_0),
                status: text(&self.status_0),
            },
            RawOrderLine {
                index: 1,
                product: &self.product_1,
                quantity: text(&self.quantity_1),
                status: text(&self.status_1),
            },
            RawOrderLine {
                index: 2,
                product: &self.product_2,
                quantity: text(&self.quantity_2),
                status: text(&self.status_2),
            },
        ]
    }

    /// Validate every non-blank row against the available products.
    ///
    /// # Errors
    ///
    /// Returns the field messages if any row is invalid or every row is blank.
    pub fn parse(&self, products: &[ProductId]) -> Result<Vec<OrderLine>, FieldErrors> {
        let mut errors = self.format_errors();
        let mut lines = Vec::new();

        for row in self.rows().into_iter().filter(|row| !row.is_blank()) {
            let product = row
                .product
                .trim()
                .parse::<i32>()
                .ok()
                .map(ProductId::new)
                .filter(|id| products.contains(id));
            if product.is_none() {
                let message = if row.product.trim().is_empty() { REQUIRED } else { INVALID_CHOICE };
                errors.add(&row.field("product"), message);
            }
            if row.quantity.trim().is_empty() {
                errors.add(&row.field("quantity"), REQUIRED);
            }
            if row.status.trim().is_empty() {
                errors.add(&row.field("status"), REQUIRED);
            }

            let quantity = row.quantity.trim().parse::<i32>().ok().filter(|q| *q >= 1);
            let status = row.status.parse::<OrderStatus>().ok();
            if let (Some(product), Some(quantity), Some(status)) = (product, quantity, status) {
                lines.push(OrderLine {
                    product,
                    quantity,
                    status,
                });
            }
        }

        if errors.is_empty() && lines.is_empty() {
            errors.add(NON_FIELD, "Add at least one order line.");
        }

        errors.into_result().map(|()| lines)
    }

    /// Per-field format errors, ignoring values on blank rows.
    fn format_errors(&self) -> FieldErrors {
        let mut errors = match validated(self) {
            Ok(()) => return FieldErrors::new(),
            Err(errors) => errors,
        };
        for row in self.rows().into_iter().filter(RawOrderLine::is_blank) {
            errors.0.remove(&row.field("quantity"));
            errors.0.remove(&row.field("status"));
        }
        errors
    }
}

/// Order update form. Only the status can change after creation.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct OrderStatusForm {
    #[validate(custom(function = "order_status"))]
    pub status: String,
}

impl OrderStatusForm {
    /// Validate and convert.
    ///
    /// # Errors
    ///
    /// Returns the field messages if the status is not a known one.
    pub fn parse(&self) -> Result<OrderStatus, FieldErrors> {
        validated(self)?;
        self.status
            .parse()
            .map_err(|_| FieldErrors::single("status", INVALID_CHOICE))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_register_form() {
        let form = RegisterForm {
            username: "jane.doe".to_string(),
            password1: "correct horse".to_string(),
            password2: "correct horse".to_string(),
        };
        assert_eq!(form.parse().unwrap(), "jane.doe");
    }

    #[test]
    fn test_register_form_errors() {
        let form = RegisterForm {
            username: "jane doe!".to_string(),
            password1: "short".to_string(),
            password2: "other".to_string(),
        };
        let errors = form.parse().unwrap_err();
        assert!(errors.has("username"));
        assert!(errors.has("password1"));
        assert_eq!(
            errors.get("password2"),
            ["The two password fields didn't match.".to_string()]
        );
    }

    #[test]
    fn test_customer_form() {
        let form = CustomerForm {
            name: " Acme ".to_string(),
            phone: "555-0100".to_string(),
            email: "buyer@acme.com".to_string(),
            address: "1 Main St".to_string(),
        };
        let input = form.parse().unwrap();
        assert_eq!(input.name, "Acme");
        assert_eq!(input.email.as_str(), "buyer@acme.com");
    }

    #[test]
    fn test_customer_form_errors_are_per_field() {
        let form = CustomerForm {
            name: String::new(),
            phone: "555-0100".to_string(),
            email: "not-an-email".to_string(),
            address: "1 Main St".to_string(),
        };
        let errors = form.parse().unwrap_err();
        assert_eq!(errors.get("name"), [REQUIRED.to_string()]);
        assert_eq!(errors.get("email"), ["Enter a valid email address.".to_string()]);
        assert!(!errors.has("phone"));
    }

    #[test]
    fn test_product_form() {
        let form = ProductForm {
            name: "Widget".to_string(),
            price: "9.99".to_string(),
            inventory: "0".to_string(),
        };
        let input = form.parse().unwrap();
        assert_eq!(input.price.to_string(), "9.99");
        assert_eq!(input.stock(), salesbook_core::StockLabel::OutOfStock);
    }

    #[test]
    fn test_product_form_rejects_bad_price() {
        let form = ProductForm {
            name: "Widget".to_string(),
            price: "0.001".to_string(),
            inventory: "many".to_string(),
        };
        let errors = form.parse().unwrap_err();
        assert_eq!(
            errors.get("price"),
            ["Ensure this value is greater than or equal to 0.01.".to_string()]
        );
        assert_eq!(errors.get("inventory"), ["Enter a whole number.".to_string()]);
    }

    #[test]
    fn test_product_form_caps_inventory() {
        let form = |inventory: &str| ProductForm {
            name: "Widget".to_string(),
            price: "1.00".to_string(),
            inventory: inventory.to_string(),
        };
        let errors = form("1000000001").parse().unwrap_err();
        assert_eq!(
            errors.get("inventory"),
            ["Ensure this value is less than or equal to 1000000000.".to_string()]
        );
        assert_eq!(form("1000000000").parse().unwrap().inventory, MAX_INVENTORY);
        assert_eq!(
            form("2147483648").parse().unwrap_err().get("inventory"),
            ["Enter a whole number.".to_string()]
        );
    }

    fn order_form(rows: [(&str, &str, &str); 3]) -> OrderLinesForm {
        let value = |s: &str| (!s.is_empty()).then(|| s.to_string());
        let [(p0, q0, s0), (p1, q1, s1), (p2, q2, s2)] = rows;
        OrderLinesForm {
            product_0: p0.to_string(),
            quantity_0: value(q0),
            status_0: value(s0),
            product_1: p1.to_string(),
            quantity_1: value(q1),
            status_1: value(s1),
            product_2: p2.to_string(),
            quantity_2: value(q2),
            status_2: value(s2),
        }
    }

    #[test]
    fn test_order_lines_skip_blank_rows() {
        let form = order_form([
            ("1", "2", "Pending"),
            ("", "", "Pending"),
            ("2", "1", "Shipped"),
        ]);
        let lines = form.parse(&[ProductId::new(1), ProductId::new(2)]).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].product, ProductId::new(2));
        assert_eq!(lines[1].status, OrderStatus::Shipped);
    }

    #[test]
    fn test_order_lines_require_one_row() {
        let form = order_form([("", "", ""), ("", "", ""), ("", "", "")]);
        let errors = form.parse(&[ProductId::new(1)]).unwrap_err();
        assert!(errors.has(NON_FIELD));
    }

    #[test]
    fn test_order_lines_reject_zero_quantity_and_unknown_product() {
        let form = order_form([("1", "0", "Pending"), ("7", "1", "Pending"), ("", "", "")]);
        let errors = form.parse(&[ProductId::new(1)]).unwrap_err();
        assert_eq!(
            errors.get("quantity_0"),
            ["Ensure this value is greater than or equal to 1.".to_string()]
        );
        assert_eq!(errors.get("product_1"), [INVALID_CHOICE.to_string()]);
    }

    #[test]
    fn test_order_status_form() {
        let form = OrderStatusForm {
            status: "Delivered".to_string(),
        };
        assert_eq!(form.parse().unwrap(), OrderStatus::Delivered);
        let form = OrderStatusForm {
            status: "Lost".to_string(),
        };
        assert!(form.parse().unwrap_err().has("status"));
    }

    #[test]
    fn test_summary() {
        let mut errors = FieldErrors::single("name", "This field is required.");
        errors.add(NON_FIELD, "Add at least one order line.");
        assert_eq!(
            errors.summary(),
            "Add at least one order line. name: This field is required."
        );
    }
}
