//! Authentication extractors.
//!
//! Provides extractors for requiring (or refusing) a logged-in user in
//! route handlers.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Paths that answer with 401 instead of a login redirect.
const API_PATHS: &[&str] = &["/data"];

/// Extractor that requires authentication.
///
/// Anonymous requests are redirected to the login page, or get
/// 401 Unauthorized on the JSON endpoint.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but the user is not logged in.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for JSON requests).
    Unauthorized,
}

impl AuthRejection {
    fn for_path(path: &str) -> Self {
        if API_PATHS.contains(&path) {
            Self::Unauthorized
        } else {
            Self::RedirectToLogin
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

async fn current_user(parts: &Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_user(parts)
            .await
            .map(Self)
            .ok_or_else(|| AuthRejection::for_path(parts.uri.path()))
    }
}

/// Extractor for pages only anonymous visitors may see (login, register).
///
/// A logged-in user is sent to the dashboard instead.
pub struct RequireAnonymous;

impl<S> FromRequestParts<S> for RequireAnonymous
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match current_user(parts).await {
            Some(_) => Err(Redirect::to("/")),
            None => Ok(Self),
        }
    }
}

/// Helper to set the current user in the session.
///
/// The session ID is cycled first so a pre-login cookie cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the session on logout.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_for_path() {
        assert_eq!(AuthRejection::for_path("/data"), AuthRejection::Unauthorized);
        assert_eq!(
            AuthRejection::for_path("/customers/1"),
            AuthRejection::RedirectToLogin
        );
    }

    #[test]
    fn test_rejection_responses() {
        let response = AuthRejection::RedirectToLogin.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").and_then(|v| v.to_str().ok()),
            Some("/login")
        );

        let response = AuthRejection::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
