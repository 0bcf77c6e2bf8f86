//! Product catalog: filtered list, create, update and delete.
//!
//! Products are shared by every user; only login is required.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use salesbook_core::ProductId;
use salesbook_core::filters::{FilterError, ProductFilter, ProductFilterQuery};
use salesbook_core::pagination::{PageRequest, sizes};

use super::{Nav, PageQuery, Pager, SelectOption};
use crate::db::ProductRepository;
use crate::error::AppError;
use crate::filters;
use crate::forms::{FieldErrors, ProductForm};
use crate::middleware::{Flash, Flashes, RequireAuth, flash_redirect};
use crate::models::Product;
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// Display-ready product row.
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub price: String,
    pub inventory: i32,
    pub stock: &'static str,
    pub in_stock: bool,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            price: filters::format_money(product.price.amount()),
            inventory: product.inventory,
            stock: product.stock.as_str(),
            in_stock: product.stock == salesbook_core::StockLabel::InStock,
        }
    }
}

/// Product filter form state, echoed back into the inputs.
pub struct ProductFilterView {
    pub name: String,
    pub stocks: Vec<SelectOption>,
    pub price_gt: String,
    pub price_lt: String,
    pub errors: Vec<FilterError>,
    pub active: bool,
}

// =============================================================================
// Templates
// =============================================================================

/// Product list page.
#[derive(Template, WebTemplate)]
#[template(path = "products/list.html")]
pub struct ProductListTemplate {
    pub nav: Nav,
    pub products: Vec<ProductView>,
    pub pager: Pager,
    pub filter: ProductFilterView,
}

/// Product create/update form.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub nav: Nav,
    pub title: &'static str,
    pub action: String,
    pub form: ProductForm,
    pub errors: FieldErrors,
}

/// Product delete confirmation page.
#[derive(Template, WebTemplate)]
#[template(path = "products/delete.html")]
pub struct ProductDeleteTemplate {
    pub nav: Nav,
    pub product: ProductView,
}

const CREATE_TITLE: &str = "Create a New Product";
const UPDATE_TITLE: &str = "Update Product Information";

async fn load(state: &AppState, product_id: i32) -> Result<Product, AppError> {
    ProductRepository::new(state.pool())
        .get(ProductId::new(product_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))
}

// =============================================================================
// List
// =============================================================================

/// Display the filtered, paginated product list.
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    flashes: Flashes,
    Query(filter_query): Query<ProductFilterQuery>,
    Query(page_query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let (filter, filter_errors) = ProductFilter::from_query(&filter_query);

    let products = ProductRepository::new(state.pool())
        .list_page(
            &filter,
            PageRequest::parse(page_query.page.as_deref()),
            sizes::PRODUCTS,
        )
        .await?;

    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    let (name, stock) = (text(&filter_query.name), text(&filter_query.stock));
    let (price_gt, price_lt) = (text(&filter_query.price_gt), text(&filter_query.price_lt));
    let pager = Pager::new(
        &products,
        "page",
        &[
            ("name", name.as_str()),
            ("stock", stock.as_str()),
            ("price__gt", price_gt.as_str()),
            ("price__lt", price_lt.as_str()),
        ],
    );

    Ok(ProductListTemplate {
        nav: Nav::user(user, flashes),
        products: products.items.iter().map(ProductView::from).collect(),
        pager,
        filter: ProductFilterView {
            name,
            stocks: SelectOption::stock_labels(Some(stock.as_str())),
            price_gt,
            price_lt,
            errors: filter_errors,
            active: filter != ProductFilter::default(),
        },
    }
    .into_response())
}

// =============================================================================
// Create
// =============================================================================

/// Display the new-product form.
pub async fn create_page(RequireAuth(user): RequireAuth, flashes: Flashes) -> impl IntoResponse {
    ProductFormTemplate {
        nav: Nav::user(user, flashes),
        title: CREATE_TITLE,
        action: "/products/new".to_string(),
        form: ProductForm::default(),
        errors: FieldErrors::new(),
    }
}

/// Handle new-product submission.
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProductForm>,
) -> Result<Response, AppError> {
    let input = match form.parse() {
        Ok(input) => input,
        Err(errors) => {
            return Ok(ProductFormTemplate {
                nav: Nav::user(user, Flashes::take(&session).await),
                title: CREATE_TITLE,
                action: "/products/new".to_string(),
                form,
                errors,
            }
            .into_response());
        }
    };

    let product = ProductRepository::new(state.pool()).create(&input).await?;

    let message = format!("Successfully created product:  {}", product.name);
    Ok(flash_redirect(&session, Flash::success(message), "/products").await)
}

// =============================================================================
// Update
// =============================================================================

/// Display the product update form.
pub async fn update_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    flashes: Flashes,
) -> Result<Response, AppError> {
    let product = load(&state, product_id).await?;
    Ok(ProductFormTemplate {
        nav: Nav::user(user, flashes),
        title: UPDATE_TITLE,
        action: format!("/products/{product_id}/update"),
        form: ProductForm::from(&product),
        errors: FieldErrors::new(),
    }
    .into_response())
}

/// Handle product update. The stock label follows the new inventory.
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    session: Session,
    Form(form): Form<ProductForm>,
) -> Result<Response, AppError> {
    let product = load(&state, product_id).await?;

    let input = match form.parse() {
        Ok(input) => input,
        Err(errors) => {
            return Ok(ProductFormTemplate {
                nav: Nav::user(user, Flashes::take(&session).await),
                title: UPDATE_TITLE,
                action: format!("/products/{product_id}/update"),
                form,
                errors,
            }
            .into_response());
        }
    };

    ProductRepository::new(state.pool())
        .update(product.id, &input)
        .await?;

    let message = format!("Successfully updated product:  {}", input.name);
    Ok(flash_redirect(&session, Flash::success(message), "/products").await)
}

// =============================================================================
// Delete
// =============================================================================

/// Display the delete confirmation page.
pub async fn delete_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    flashes: Flashes,
) -> Result<Response, AppError> {
    let product = load(&state, product_id).await?;
    Ok(ProductDeleteTemplate {
        nav: Nav::user(user, flashes),
        product: ProductView::from(&product),
    }
    .into_response())
}

/// Handle product deletion. Orders for it remain with no product.
pub async fn delete(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    session: Session,
) -> Result<Response, AppError> {
    let product = load(&state, product_id).await?;
    ProductRepository::new(state.pool()).delete(product.id).await?;

    let message = format!("{} has been deleted.", product.name);
    Ok(flash_redirect(&session, Flash::warning(message), "/products").await)
}
