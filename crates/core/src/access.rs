//! Ownership checks for customer-scoped resources.
//!
//! Customers (and everything hanging off them) belong to the profile that
//! created them. A customer whose owning profile was deleted keeps existing
//! with no owner and is then visible to nobody.

use crate::types::ProfileId;

/// A resource that may belong to a profile.
pub trait Owned {
    /// The owning profile, or `None` if the owner no longer exists.
    fn owner(&self) -> Option<ProfileId>;
}

impl Owned for ProfileId {
    fn owner(&self) -> Option<ProfileId> {
        Some(*self)
    }
}

impl<T: Owned + ?Sized> Owned for &T {
    fn owner(&self) -> Option<ProfileId> {
        (**self).owner()
    }
}

/// The requester does not own the resource.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{}", Self::NOTICE)]
pub struct AccessDenied;

impl AccessDenied {
    /// Message shown to the user after being redirected away.
    pub const NOTICE: &'static str = "You are not authorized to view this page...";
}

/// Grant access iff `requester` owns `resource`.
///
/// # Errors
///
/// Returns [`AccessDenied`] when the resource belongs to another profile or
/// has no owner at all.
pub fn authorize(requester: ProfileId, resource: &impl Owned) -> Result<(), AccessDenied> {
    match resource.owner() {
        Some(owner) if owner == requester => Ok(()),
        _ => Err(AccessDenied),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ledger(Option<ProfileId>);

    impl Owned for Ledger {
        fn owner(&self) -> Option<ProfileId> {
            self.0
        }
    }

    #[test]
    fn test_owner_is_granted() {
        let me = ProfileId::new(7);
        assert_eq!(authorize(me, &Ledger(Some(me))), Ok(()));
    }

    #[test]
    fn test_other_profile_is_denied() {
        let me = ProfileId::new(7);
        let someone_else = ProfileId::new(8);
        assert_eq!(
            authorize(me, &Ledger(Some(someone_else))),
            Err(AccessDenied)
        );
    }

    #[test]
    fn test_orphaned_resource_is_denied() {
        assert_eq!(
            authorize(ProfileId::new(1), &Ledger(None)),
            Err(AccessDenied)
        );
    }

    #[test]
    fn test_profile_owns_itself() {
        let me = ProfileId::new(3);
        assert!(authorize(me, &me).is_ok());
        assert!(authorize(ProfileId::new(4), &me).is_err());
    }

    #[test]
    fn test_notice_text() {
        assert_eq!(
            AccessDenied.to_string(),
            "You are not authorized to view this page..."
        );
    }
}
