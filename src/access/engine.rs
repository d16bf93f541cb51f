use std::collections::HashSet;

use crate::access::errors::AccessError;
use crate::access::store::PageAccess;
use crate::access::types::{Action, Role, RoleId, User};

/// Answers read-access questions against a page's current entries.
///
/// The role-level and user-level checks deliberately differ:
/// `is_readable_by_role` honours the superuser flag and allows any role
/// without an entry, while `can_user_read` ignores the superuser flag and
/// only opens up when the page has no readable entry at all.
#[derive(Debug, Clone)]
pub struct Authorizer {
    anonymous: Role,
}

impl Authorizer {
    /// `anonymous` stands in for unauthenticated actors.
    pub fn new(anonymous: Role) -> Self {
        Self { anonymous }
    }

    pub fn anonymous_role(&self) -> &Role {
        &self.anonymous
    }

    /// Can `role` read the page?
    pub fn is_readable_by_role(&self, page: &PageAccess, role: &Role) -> bool {
        if role.superuser {
            return true;
        }
        page.entry_for(role.id).map_or(true, |entry| entry.can_read)
    }

    /// Can `user` read the page? `None` means unauthenticated.
    pub fn can_user_read(&self, page: &PageAccess, user: Option<&User>) -> bool {
        let readable: HashSet<RoleId> = page.readable_roles().map(|r| r.id).collect();
        if readable.is_empty() {
            return true;
        }

        let actor_roles: &[Role] = match user {
            Some(user) => &user.roles,
            None => std::slice::from_ref(&self.anonymous),
        };
        actor_roles.iter().any(|r| readable.contains(&r.id))
    }

    /// Entry point for callers that pass the action by name.
    pub fn can_read(
        &self,
        page: &PageAccess,
        user: Option<&User>,
        action: &str,
    ) -> Result<bool, AccessError> {
        match action.parse::<Action>()? {
            Action::Read => Ok(self.can_user_read(page, user)),
        }
    }
}
