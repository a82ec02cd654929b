use crate::users::{UserId, UserRole};
use std::collections::BTreeSet;

/// Identity of the user that performs the request, resolved by the host platform before any key
/// operation runs: who the user is, their role, and the groups they belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// Host platform user ID.
    pub id: UserId,
    /// Host platform role.
    pub role: UserRole,
    /// IDs of the host platform groups the user is a member of.
    pub groups: BTreeSet<String>,
}

impl Caller {
    /// Returns `true` if the caller is a host platform administrator.
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Returns `true` if the caller is a member of at least one of the specified groups.
    pub fn is_member_of_any<I, G>(&self, groups: I) -> bool
    where
        I: IntoIterator<Item = G>,
        G: AsRef<str>,
    {
        groups
            .into_iter()
            .any(|group| self.groups.contains(group.as_ref()))
    }

    /// Returns the groups from the specified list the caller isn't a member of.
    pub fn foreign_groups<'g>(&self, groups: &'g [String]) -> Vec<&'g str> {
        groups
            .iter()
            .filter(|group| !self.groups.contains(group.as_str()))
            .map(String::as_str)
            .collect()
    }
}
