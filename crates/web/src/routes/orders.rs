//! Order create, status update and delete, nested under a customer.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use salesbook_core::{OrderStatus, ProductId};

use super::customers::CustomerView;
use super::{MISSING, Nav, SelectOption};
use crate::db::products::ProductChoice;
use crate::db::{OrderRepository, ProductRepository, RepositoryError};
use crate::error::AppError;
use crate::filters::{self, format_money};
use crate::forms::{FieldErrors, NON_FIELD, OrderLinesForm, OrderStatusForm};
use crate::middleware::{Flash, Flashes, OwnedCustomer, OwnedOrder, flash_redirect};
use crate::models::{Customer, Order};
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// Display-ready order row.
pub struct OrderView {
    pub id: i32,
    pub customer_id: Option<i32>,
    pub customer_name: String,
    pub product_name: String,
    pub quantity: i32,
    pub status: &'static str,
    pub closed: bool,
    pub total: String,
    pub order_date: String,
    pub label: String,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.as_i32(),
            customer_id: order.customer_id.map(|id| id.as_i32()),
            customer_name: order
                .customer_name
                .clone()
                .unwrap_or_else(|| MISSING.to_string()),
            product_name: order
                .product
                .as_ref()
                .map_or_else(|| MISSING.to_string(), |p| p.name.clone()),
            quantity: order.quantity,
            status: order.status.as_str(),
            closed: order.status.is_closed(),
            total: order
                .total_price()
                .map_or_else(|| MISSING.to_string(), format_money),
            order_date: order.order_date.format("%b %-d, %Y").to_string(),
            label: order.label(),
        }
    }
}

/// One line of the new-order form.
pub struct OrderLineView {
    pub index: usize,
    pub products: Vec<SelectOption>,
    pub quantity: String,
    pub statuses: Vec<SelectOption>,
    pub product_errors: Vec<String>,
    pub quantity_errors: Vec<String>,
    pub status_errors: Vec<String>,
}

fn line_views(form: &OrderLinesForm, choices: &[ProductChoice], errors: &FieldErrors) -> Vec<OrderLineView> {
    form.rows()
        .into_iter()
        .map(|row| {
            let status = if row.status.trim().is_empty() {
                OrderStatus::default().as_str()
            } else {
                row.status
            };
            OrderLineView {
                index: row.index,
                products: SelectOption::products(choices, Some(row.product)),
                quantity: row.quantity.to_string(),
                statuses: SelectOption::statuses(Some(status)),
                product_errors: errors.get(&row.field("product")).to_vec(),
                quantity_errors: errors.get(&row.field("quantity")).to_vec(),
                status_errors: errors.get(&row.field("status")).to_vec(),
            }
        })
        .collect()
}

// =============================================================================
// Templates
// =============================================================================

/// New-order form with up to three lines.
#[derive(Template, WebTemplate)]
#[template(path = "orders/form.html")]
pub struct OrderFormTemplate {
    pub nav: Nav,
    pub customer: CustomerView,
    pub lines: Vec<OrderLineView>,
    pub errors: Vec<String>,
}

/// Order status update form.
#[derive(Template, WebTemplate)]
#[template(path = "orders/update.html")]
pub struct OrderUpdateTemplate {
    pub nav: Nav,
    pub customer: CustomerView,
    pub order: OrderView,
    pub statuses: Vec<SelectOption>,
    pub errors: FieldErrors,
}

/// Order delete confirmation page.
#[derive(Template, WebTemplate)]
#[template(path = "orders/delete.html")]
pub struct OrderDeleteTemplate {
    pub nav: Nav,
    pub customer: CustomerView,
    pub order: OrderView,
}

fn order_form(
    nav: Nav,
    customer: &Customer,
    form: &OrderLinesForm,
    choices: &[ProductChoice],
    errors: &FieldErrors,
) -> Response {
    OrderFormTemplate {
        nav,
        customer: CustomerView::from(customer),
        lines: line_views(form, choices, errors),
        errors: errors.get(NON_FIELD).to_vec(),
    }
    .into_response()
}

// =============================================================================
// Create
// =============================================================================

/// Display the new-order form.
pub async fn create_page(
    OwnedCustomer { user, customer }: OwnedCustomer,
    State(state): State<AppState>,
    flashes: Flashes,
) -> Result<Response, AppError> {
    let choices = ProductRepository::new(state.pool()).list_choices().await?;
    Ok(order_form(
        Nav::user(user, flashes),
        &customer,
        &OrderLinesForm::default(),
        &choices,
        &FieldErrors::new(),
    ))
}

/// Handle new-order submission.
///
/// All lines are written in one transaction; if any line asks for more than
/// the product has in stock, none are.
pub async fn create(
    OwnedCustomer { user, customer }: OwnedCustomer,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<OrderLinesForm>,
) -> Result<Response, AppError> {
    let choices = ProductRepository::new(state.pool()).list_choices().await?;
    let available: Vec<ProductId> = choices.iter().map(|c| c.id).collect();

    let lines = match form.parse(&available) {
        Ok(lines) => lines,
        Err(errors) => {
            let nav = Nav::user(user, Flashes::take(&session).await);
            return Ok(order_form(nav, &customer, &form, &choices, &errors));
        }
    };

    let errors = match OrderRepository::new(state.pool())
        .create_many(customer.id, &lines)
        .await
    {
        Ok(_) => {
            let to = format!("/customers/{}", customer.id);
            return Ok(flash_redirect(&session, Flash::success("Successfully created order."), &to).await);
        }
        Err(RepositoryError::InsufficientInventory { product, available }) => FieldErrors::single(
            NON_FIELD,
            format!("Not enough {product} in stock: {available} available."),
        ),
        Err(RepositoryError::NotFound) => FieldErrors::single(
            NON_FIELD,
            "Select a valid choice. That choice is not one of the available choices.",
        ),
        Err(e) => return Err(e.into()),
    };

    let nav = Nav::user(user, Flashes::take(&session).await);
    Ok(order_form(nav, &customer, &form, &choices, &errors))
}

// =============================================================================
// Update
// =============================================================================

/// Display the order status form.
pub async fn update_page(
    OwnedOrder { user, customer, order }: OwnedOrder,
    flashes: Flashes,
) -> impl IntoResponse {
    OrderUpdateTemplate {
        nav: Nav::user(user, flashes),
        customer: CustomerView::from(&customer),
        statuses: SelectOption::statuses(Some(order.status.as_str())),
        order: OrderView::from(&order),
        errors: FieldErrors::new(),
    }
}

/// Handle order status update.
pub async fn update(
    OwnedOrder { user, customer, order }: OwnedOrder,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<OrderStatusForm>,
) -> Result<Response, AppError> {
    let status = match form.parse() {
        Ok(status) => status,
        Err(errors) => {
            return Ok(OrderUpdateTemplate {
                nav: Nav::user(user, Flashes::take(&session).await),
                customer: CustomerView::from(&customer),
                statuses: SelectOption::statuses(Some(&form.status)),
                order: OrderView::from(&order),
                errors,
            }
            .into_response());
        }
    };

    OrderRepository::new(state.pool())
        .update_status(order.id, status)
        .await?;
    tracing::info!(order_id = %order.id, status = %status, "order status updated");

    let to = format!("/customers/{}", customer.id);
    Ok(flash_redirect(&session, Flash::success("Successfully updated order!"), &to).await)
}

// =============================================================================
// Delete
// =============================================================================

/// Display the delete confirmation page.
pub async fn delete_page(
    OwnedOrder { user, customer, order }: OwnedOrder,
    flashes: Flashes,
) -> impl IntoResponse {
    OrderDeleteTemplate {
        nav: Nav::user(user, flashes),
        customer: CustomerView::from(&customer),
        order: OrderView::from(&order),
    }
}

/// Handle order deletion. The quantity goes back into the product's stock.
pub async fn delete(
    OwnedOrder { customer, order, .. }: OwnedOrder,
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    OrderRepository::new(state.pool()).delete(order.id).await?;

    let message = format!("Order:  {} has been deleted.", order.label());
    let to = format!("/customers/{}", customer.id);
    Ok(flash_redirect(&session, Flash::warning(message), &to).await)
}
