//! Profile model.

use chrono::NaiveDate;

use salesbook_core::{AccountId, Email, Owned, ProfileId};

/// Personal details attached one-to-one to an account.
///
/// Created empty at registration; the name fields stay `None` until the
/// owner completes the profile form.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: ProfileId,
    pub account_id: AccountId,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub start_date: NaiveDate,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl Profile {
    /// A profile counts as complete once it has a first name.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.first_name.as_deref().is_some_and(|name| !name.trim().is_empty())
    }

    /// "First Last", skipping missing parts.
    #[must_use]
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            self.username.clone().unwrap_or_default()
        } else {
            parts.join(" ")
        }
    }
}

impl Owned for Profile {
    fn owner(&self) -> Option<ProfileId> {
        Some(self.id)
    }
}

/// Validated profile form data.
#[derive(Debug, Clone)]
pub struct ProfileInput {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Email,
    pub address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(first: Option<&str>, last: Option<&str>) -> Profile {
        Profile {
            id: ProfileId::new(1),
            account_id: AccountId::new(1),
            username: Some("jdoe".to_string()),
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            start_date: NaiveDate::MIN,
            phone: String::new(),
            email: String::new(),
            address: String::new(),
        }
    }

    #[test]
    fn test_is_complete() {
        assert!(!profile(None, None).is_complete());
        assert!(!profile(Some(" "), None).is_complete());
        assert!(profile(Some("Jane"), None).is_complete());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(profile(Some("Jane"), Some("Doe")).display_name(), "Jane Doe");
        assert_eq!(profile(Some("Jane"), None).display_name(), "Jane");
        assert_eq!(profile(None, None).display_name(), "jdoe");
    }

    #[test]
    fn test_profile_owns_itself() {
        let p = profile(None, None);
        assert_eq!(p.owner(), Some(p.id));
    }
}
