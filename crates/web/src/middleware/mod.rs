//! HTTP middleware and extractors.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! Authentication and ownership are enforced per handler by extractors.

pub mod auth;
pub mod flash;
pub mod ownership;
pub mod request_id;
pub mod session;

pub use auth::{RequireAnonymous, RequireAuth, clear_current_user, set_current_user};
pub use flash::{Flash, Flashes, flash_redirect};
pub use ownership::{OwnedCustomer, OwnedOrder, OwnedProfile};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
