//! One-shot flash messages carried across a redirect in the session.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session_keys;

/// Flash severity, used as the CSS class in templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
}

impl FlashLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

/// A message shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Warning,
            message: message.into(),
        }
    }
}

/// Queue a flash message for the next page.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
async fn push_flash(session: &Session, flash: Flash) -> Result<(), tower_sessions::session::Error> {
    let mut pending: Vec<Flash> = session
        .get(session_keys::FLASHES)
        .await?
        .unwrap_or_default();
    pending.push(flash);
    session.insert(session_keys::FLASHES, pending).await
}

/// Queue a flash message and redirect.
///
/// A session failure is logged and the redirect still happens.
pub async fn flash_redirect(session: &Session, flash: Flash, to: &str) -> Response {
    if let Err(e) = push_flash(session, flash).await {
        tracing::warn!(error = %e, "failed to store flash message");
    }
    Redirect::to(to).into_response()
}

/// Pending flash messages, drained from the session.
///
/// As an extractor this drains on every request, so handlers that may
/// redirect call [`Flashes::take`] on the branch that renders instead.
pub struct Flashes(pub Vec<Flash>);

impl Flashes {
    /// Drain the pending messages for a page about to render.
    pub async fn take(session: &Session) -> Self {
        let flashes = session
            .remove::<Vec<Flash>>(session_keys::FLASHES)
            .await
            .ok()
            .flatten()
            .unwrap_or_default();
        Self(flashes)
    }
}

impl<S> FromRequestParts<S> for Flashes
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Session>() {
            Some(session) => Ok(Self::take(session).await),
            None => Ok(Self(Vec::new())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[test]
    fn test_flash_constructors() {
        assert_eq!(Flash::success("ok").level, FlashLevel::Success);
        assert_eq!(Flash::info("fyi").level, FlashLevel::Info);
        assert_eq!(Flash::warning("gone").level.as_str(), "warning");
    }

    #[test]
    fn test_flash_serializes_level_lowercase() {
        let json = serde_json::to_value(Flash::warning("Widget has been deleted.")).unwrap();
        assert_eq!(json["level"], "warning");
        assert_eq!(json["message"], "Widget has been deleted.");

        let back: Flash = serde_json::from_value(json).unwrap();
        assert_eq!(back, Flash::warning("Widget has been deleted."));
    }

    #[tokio::test]
    async fn test_flashes_survive_redirects_until_taken() {
        let session = session();
        let _ = flash_redirect(&session, Flash::success("Successfully created order."), "/").await;
        let _ = flash_redirect(&session, Flash::info("second"), "/").await;

        let Flashes(first) = Flashes::take(&session).await;
        assert_eq!(
            first,
            vec![Flash::success("Successfully created order."), Flash::info("second")]
        );

        let Flashes(again) = Flashes::take(&session).await;
        assert!(again.is_empty());
    }

    #[tokio::test]
    async fn test_redirect_response() {
        let response =
            flash_redirect(&session(), Flash::warning("Order not found."), "/customers/4").await;
        assert_eq!(response.status(), axum::http::StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/customers/4");
    }
}
