//! Role-derived visibility for list queries.

use uuid::Uuid;

use super::AccountRole;

/// Which rows a caller may see in a list query.
///
/// Derived once per request from the caller's role and applied uniformly by
/// the project, membership, milestone and invitation repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessScope {
    /// Everything.
    Unrestricted,
    /// Rows under projects supervised by this lecturer.
    Supervisor(Uuid),
    /// Rows under projects whose team includes this account.
    Member(Uuid),
}

impl AccessScope {
    /// Derives the scope for an account.
    pub fn for_account(account_id: Uuid, role: AccountRole) -> Self {
        match role {
            AccountRole::Admin => AccessScope::Unrestricted,
            AccountRole::Lecturer => AccessScope::Supervisor(account_id),
            AccountRole::Student => AccessScope::Member(account_id),
        }
    }

    /// The account the scope is anchored to, if any.
    pub fn account_id(&self) -> Option<Uuid> {
        match self {
            AccessScope::Unrestricted => None,
            AccessScope::Supervisor(id) | AccessScope::Member(id) => Some(*id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_follows_role() {
        let id = Uuid::new_v4();
        assert_eq!(
            AccessScope::for_account(id, AccountRole::Admin),
            AccessScope::Unrestricted
        );
        assert_eq!(
            AccessScope::for_account(id, AccountRole::Lecturer),
            AccessScope::Supervisor(id)
        );
        assert_eq!(
            AccessScope::for_account(id, AccountRole::Student),
            AccessScope::Member(id)
        );
        assert_eq!(AccessScope::Unrestricted.account_id(), None);
        assert_eq!(AccessScope::Member(id).account_id(), Some(id));
    }
}
