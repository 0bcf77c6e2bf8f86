//! Dashboard: the user's customers, their recent orders and sales charts.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use salesbook_core::filters::CustomerSearch;
use salesbook_core::pagination::{PageRequest, sizes};

use super::customers::CustomerView;
use super::orders::OrderView;
use super::{Nav, Pager};
use crate::db::{CustomerRepository, OrderRepository};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{Flashes, RequireAuth};
use crate::state::AppState;

/// Dashboard query: `q` searches customers, `page` and `order_page`
/// page the two lists independently.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DashboardQuery {
    pub q: Option<String>,
    pub page: Option<String>,
    pub order_page: Option<String>,
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub nav: Nav,
    pub q: String,
    pub customers: Vec<CustomerView>,
    pub customer_pager: Pager,
    pub orders: Vec<OrderView>,
    pub order_pager: Pager,
}

/// Display the dashboard.
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    flashes: Flashes,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, AppError> {
    let search = CustomerSearch::parse(query.q.as_deref());
    let customer_page = PageRequest::parse(query.page.as_deref());
    let order_page = PageRequest::parse(query.order_page.as_deref());

    let customers = CustomerRepository::new(state.pool())
        .list_page(user.profile_id, &search, customer_page, sizes::DASHBOARD_CUSTOMERS)
        .await?;
    let orders = OrderRepository::new(state.pool())
        .recent_for_owner(user.profile_id, order_page, sizes::DASHBOARD_ORDERS)
        .await?;

    let q = search.term().unwrap_or_default().to_string();
    let customer_number = customers.number().to_string();
    let order_number = orders.number().to_string();
    let customer_pager = Pager::new(
        &customers,
        "page",
        &[("q", q.as_str()), ("order_page", order_number.as_str())],
    );
    let order_pager = Pager::new(
        &orders,
        "order_page",
        &[("q", q.as_str()), ("page", customer_number.as_str())],
    );

    Ok(DashboardTemplate {
        nav: Nav::user(user, flashes),
        q,
        customers: customers.items.iter().map(CustomerView::from).collect(),
        customer_pager,
        orders: orders.items.iter().map(OrderView::from).collect(),
        order_pager,
    }
    .into_response())
}
