//! Customer create, detail, update and delete.
//!
//! The detail page carries the customer's order statistics and a filtered,
//! paginated list of their orders.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use salesbook_core::filters::{FilterError, OrderFilter, OrderFilterQuery};
use salesbook_core::pagination::{PageRequest, sizes};

use super::orders::OrderView;
use super::{Nav, PageQuery, Pager, SelectOption};
use crate::db::{CustomerRepository, OrderRepository, ProductRepository};
use crate::error::AppError;
use crate::filters;
use crate::forms::{CustomerForm, FieldErrors};
use crate::middleware::{Flash, Flashes, OwnedCustomer, RequireAuth, flash_redirect};
use crate::models::{Customer, CustomerStats};
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// Display-ready customer.
pub struct CustomerView {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub join_date: String,
}

impl From<&Customer> for CustomerView {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id.as_i32(),
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            email: customer.email.to_string(),
            address: customer.address.clone(),
            join_date: customer.join_date.format("%b %-d, %Y").to_string(),
        }
    }
}

/// Order filter form state, echoed back into the inputs.
pub struct OrderFilterView {
    pub products: Vec<SelectOption>,
    pub statuses: Vec<SelectOption>,
    pub start_date: String,
    pub end_date: String,
    pub errors: Vec<FilterError>,
    pub active: bool,
}

// =============================================================================
// Templates
// =============================================================================

/// Customer create/update form.
#[derive(Template, WebTemplate)]
#[template(path = "customers/form.html")]
pub struct CustomerFormTemplate {
    pub nav: Nav,
    pub title: &'static str,
    pub action: String,
    pub form: CustomerForm,
    pub errors: FieldErrors,
}

/// Customer detail page.
#[derive(Template, WebTemplate)]
#[template(path = "customers/detail.html")]
pub struct CustomerTemplate {
    pub nav: Nav,
    pub customer: CustomerView,
    pub stats: CustomerStats,
    pub orders: Vec<OrderView>,
    pub pager: Pager,
    pub filter: OrderFilterView,
}

/// Customer delete confirmation page.
#[derive(Template, WebTemplate)]
#[template(path = "customers/delete.html")]
pub struct CustomerDeleteTemplate {
    pub nav: Nav,
    pub customer: CustomerView,
}

const CREATE_TITLE: &str = "Add a New Customer";
const UPDATE_TITLE: &str = "Update Customer Information";

// =============================================================================
// Create
// =============================================================================

/// Display the new-customer form.
pub async fn create_page(RequireAuth(user): RequireAuth, flashes: Flashes) -> impl IntoResponse {
    CustomerFormTemplate {
        nav: Nav::user(user, flashes),
        title: CREATE_TITLE,
        action: "/customers/new".to_string(),
        form: CustomerForm::default(),
        errors: FieldErrors::new(),
    }
}

/// Handle new-customer submission. The customer belongs to the current user.
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CustomerForm>,
) -> Result<Response, AppError> {
    let input = match form.parse() {
        Ok(input) => input,
        Err(errors) => {
            return Ok(CustomerFormTemplate {
                nav: Nav::user(user, Flashes::take(&session).await),
                title: CREATE_TITLE,
                action: "/customers/new".to_string(),
                form,
                errors,
            }
            .into_response());
        }
    };

    let customer = CustomerRepository::new(state.pool())
        .create(user.profile_id, &input)
        .await?;

    let message = format!("Successfully created customer:  {}", customer.name);
    Ok(flash_redirect(&session, Flash::success(message), "/").await)
}

// =============================================================================
// Detail
// =============================================================================

/// Display a customer with statistics and filtered orders.
pub async fn show(
    OwnedCustomer { user, customer }: OwnedCustomer,
    State(state): State<AppState>,
    flashes: Flashes,
    Query(filter_query): Query<OrderFilterQuery>,
    Query(page_query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let (filter, filter_errors) = OrderFilter::from_query(&filter_query);

    let stats = CustomerRepository::new(state.pool())
        .order_stats(customer.id)
        .await?;
    let orders = OrderRepository::new(state.pool())
        .list_for_customer(
            customer.id,
            &filter,
            PageRequest::parse(page_query.page.as_deref()),
            sizes::CUSTOMER_ORDERS,
        )
        .await?;
    let choices = ProductRepository::new(state.pool()).list_choices().await?;

    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    let (product, status) = (text(&filter_query.product), text(&filter_query.status));
    let (start_date, end_date) = (text(&filter_query.start_date), text(&filter_query.end_date));
    let pager = Pager::new(
        &orders,
        "page",
        &[
            ("product", product.as_str()),
            ("status", status.as_str()),
            ("start_date", start_date.as_str()),
            ("end_date", end_date.as_str()),
        ],
    );

    Ok(CustomerTemplate {
        nav: Nav::user(user, flashes),
        customer: CustomerView::from(&customer),
        stats,
        orders: orders.items.iter().map(OrderView::from).collect(),
        pager,
        filter: OrderFilterView {
            products: SelectOption::products(&choices, Some(product.as_str())),
            statuses: SelectOption::statuses(Some(status.as_str())),
            start_date,
            end_date,
            errors: filter_errors,
            active: !filter.is_empty(),
        },
    }
    .into_response())
}

// =============================================================================
// Update
// =============================================================================

/// Display the customer update form.
pub async fn update_page(
    OwnedCustomer { user, customer }: OwnedCustomer,
    flashes: Flashes,
) -> impl IntoResponse {
    CustomerFormTemplate {
        nav: Nav::user(user, flashes),
        title: UPDATE_TITLE,
        action: format!("/customers/{}/update", customer.id),
        form: CustomerForm::from(&customer),
        errors: FieldErrors::new(),
    }
}

/// Handle customer update.
pub async fn update(
    OwnedCustomer { user, customer }: OwnedCustomer,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CustomerForm>,
) -> Result<Response, AppError> {
    let input = match form.parse() {
        Ok(input) => input,
        Err(errors) => {
            return Ok(CustomerFormTemplate {
                nav: Nav::user(user, Flashes::take(&session).await),
                title: UPDATE_TITLE,
                action: format!("/customers/{}/update", customer.id),
                form,
                errors,
            }
            .into_response());
        }
    };

    CustomerRepository::new(state.pool())
        .update(customer.id, &input)
        .await?;

    let message = format!("Successfully updated customer:  {}", input.name);
    let to = format!("/customers/{}", customer.id);
    Ok(flash_redirect(&session, Flash::success(message), &to).await)
}

// =============================================================================
// Delete
// =============================================================================

/// Display the delete confirmation page.
pub async fn delete_page(
    OwnedCustomer { user, customer }: OwnedCustomer,
    flashes: Flashes,
) -> impl IntoResponse {
    CustomerDeleteTemplate {
        nav: Nav::user(user, flashes),
        customer: CustomerView::from(&customer),
    }
}

/// Handle customer deletion. The customer's orders stay, without a customer.
pub async fn delete(
    OwnedCustomer { customer, .. }: OwnedCustomer,
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    CustomerRepository::new(state.pool())
        .delete(customer.id)
        .await?;

    let message = format!("{} has been deleted.", customer.name);
    Ok(flash_redirect(&session, Flash::warning(message), "/").await)
}
