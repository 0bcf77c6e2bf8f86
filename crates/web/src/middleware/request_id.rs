//! Request ID middleware for request tracing and correlation.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream ID accepted as-is.
const MAX_UPSTREAM_LEN: usize = 64;

/// Ensure every request carries an ID.
///
/// A well-formed upstream `x-request-id` is reused, anything else is replaced
/// with a fresh UUID v4. The ID is recorded on the current span, tagged on
/// the Sentry scope and echoed back in the response headers.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id =
        upstream_id(request.headers()).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// The caller's request ID, if it is short and made of `[A-Za-z0-9._-]`.
fn upstream_id(headers: &HeaderMap) -> Option<String> {
    let id = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?.trim();
    let well_formed = !id.is_empty()
        && id.len() <= MAX_UPSTREAM_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    well_formed.then(|| id.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_upstream_id_reused() {
        assert_eq!(
            upstream_id(&headers("edge-7f3a.42")).as_deref(),
            Some("edge-7f3a.42")
        );
    }

    #[test]
    fn test_upstream_id_rejects_junk() {
        assert!(upstream_id(&HeaderMap::new()).is_none());
        assert!(upstream_id(&headers("")).is_none());
        assert!(upstream_id(&headers("a b")).is_none());
        assert!(upstream_id(&headers(&"x".repeat(65))).is_none());
    }
}
