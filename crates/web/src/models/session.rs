//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use salesbook_core::{AccountId, ProfileId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in account and
/// the profile its customers belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub account_id: AccountId,
    pub profile_id: ProfileId,
    pub username: String,
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for pending flash messages.
    pub const FLASHES: &str = "flashes";
}
