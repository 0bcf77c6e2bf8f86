//! Ownership extractors.
//!
//! Each extractor loads the record named in the path and checks it belongs
//! to the logged-in user's profile before the handler runs. A denial never
//! reaches the handler: the visitor is sent to the dashboard with a notice.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use salesbook_core::{AccessDenied, CustomerId, OrderId, Owned, ProfileId, authorize};

use super::auth::RequireAuth;
use super::flash::{Flash, flash_redirect};
use crate::db::{CustomerRepository, OrderRepository, ProfileRepository};
use crate::error::AppError;
use crate::models::{CurrentUser, Customer, Order, Profile};
use crate::state::AppState;

/// Rejection for the ownership extractors.
pub enum OwnershipRejection {
    /// Not logged in.
    Auth(super::auth::AuthRejection),
    /// Missing or foreign record; flash already queued.
    Redirect(Response),
    /// Database or session failure.
    Error(AppError),
}

impl IntoResponse for OwnershipRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Auth(rejection) => rejection.into_response(),
            Self::Redirect(response) => response,
            Self::Error(error) => error.into_response(),
        }
    }
}

impl From<AppError> for OwnershipRejection {
    fn from(error: AppError) -> Self {
        Self::Error(error)
    }
}

#[derive(Deserialize)]
struct CustomerPath {
    customer_id: i32,
}

#[derive(Deserialize)]
struct OrderPath {
    customer_id: i32,
    order_id: i32,
}

#[derive(Deserialize)]
struct ProfilePath {
    profile_id: i32,
}

fn session(parts: &Parts) -> Result<Session, OwnershipRejection> {
    parts
        .extensions
        .get::<Session>()
        .cloned()
        .ok_or_else(|| OwnershipRejection::Error(AppError::Internal("session layer missing".to_string())))
}

async fn path<T, S>(parts: &mut Parts, state: &S) -> Option<T>
where
    T: serde::de::DeserializeOwned + Send,
    S: Send + Sync,
{
    Path::<T>::from_request_parts(parts, state).await.ok().map(|Path(value)| value)
}

/// Send the visitor home with a flash.
async fn turn_away(session: &Session, flash: Flash) -> OwnershipRejection {
    OwnershipRejection::Redirect(flash_redirect(session, flash, "/").await)
}

/// Check ownership, or turn the visitor away with the standard notice.
async fn check(
    session: &Session,
    user: &CurrentUser,
    resource: &impl Owned,
) -> Result<(), OwnershipRejection> {
    if authorize(user.profile_id, resource).is_ok() {
        return Ok(());
    }
    tracing::warn!(
        profile_id = %user.profile_id,
        owner = ?resource.owner(),
        "access denied"
    );
    Err(turn_away(session, Flash::info(AccessDenied::NOTICE)).await)
}

async fn load_customer(
    parts: &mut Parts,
    state: &AppState,
) -> Result<(CurrentUser, Session, Customer), OwnershipRejection> {
    let RequireAuth(user) = RequireAuth::from_request_parts(parts, state)
        .await
        .map_err(OwnershipRejection::Auth)?;
    let session = session(parts)?;

    let Some(CustomerPath { customer_id }) = path(parts, state).await else {
        return Err(turn_away(&session, Flash::warning("Customer not found.")).await);
    };

    let customer = CustomerRepository::new(state.pool())
        .get(CustomerId::new(customer_id))
        .await
        .map_err(AppError::from)?;
    let Some(customer) = customer else {
        return Err(turn_away(&session, Flash::warning("Customer not found.")).await);
    };

    check(&session, &user, &customer).await?;
    Ok((user, session, customer))
}

/// A customer owned by the logged-in user, from `{customer_id}`.
pub struct OwnedCustomer {
    pub user: CurrentUser,
    pub customer: Customer,
}

impl FromRequestParts<AppState> for OwnedCustomer {
    type Rejection = OwnershipRejection;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let (user, _, customer) = load_customer(parts, state).await?;
        Ok(Self { user, customer })
    }
}

/// An order of a customer owned by the logged-in user, from
/// `{customer_id}/orders/{order_id}`.
pub struct OwnedOrder {
    pub user: CurrentUser,
    pub customer: Customer,
    pub order: Order,
}

impl FromRequestParts<AppState> for OwnedOrder {
    type Rejection = OwnershipRejection;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let (user, session, customer) = load_customer(parts, state).await?;
        let customer_page = format!("/customers/{}", customer.id);

        let order = match path::<OrderPath, _>(parts, state).await {
            Some(OrderPath { order_id, customer_id }) if customer_id == customer.id.as_i32() => {
                OrderRepository::new(state.pool())
                    .get(OrderId::new(order_id))
                    .await
                    .map_err(AppError::from)?
            }
            _ => None,
        };

        match order {
            Some(order) if order.customer_id == Some(customer.id) => Ok(Self {
                user,
                customer,
                order,
            }),
            _ => Err(OwnershipRejection::Redirect(
                flash_redirect(&session, Flash::warning("Order not found."), &customer_page).await,
            )),
        }
    }
}

/// A profile belonging to the logged-in user, from `{profile_id}`.
pub struct OwnedProfile {
    pub user: CurrentUser,
    pub profile: Profile,
}

impl FromRequestParts<AppState> for OwnedProfile {
    type Rejection = OwnershipRejection;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state)
            .await
            .map_err(OwnershipRejection::Auth)?;
        let session = session(parts)?;

        let profile = match path::<ProfilePath, _>(parts, state).await {
            Some(ProfilePath { profile_id }) => ProfileRepository::new(state.pool())
                .get(ProfileId::new(profile_id))
                .await
                .map_err(AppError::from)?,
            None => None,
        };
        let Some(profile) = profile else {
            return Err(turn_away(&session, Flash::info(AccessDenied::NOTICE)).await);
        };

        check(&session, &user, &profile).await?;
        Ok(Self { user, profile })
    }
}
