use std::collections::HashSet;

use crate::access::errors::AccessError;
use crate::access::types::{AccessEntry, Role, RoleId};

/// Changes needed to bring a page's entries in line with a desired set of
/// readable roles.
#[derive(Debug, Clone, Default)]
pub struct ReconcilePlan {
    /// New entries, already carrying their final `can_read` flag.
    pub to_create: Vec<AccessEntry>,
    /// Existing entries whose flag flips, with the new flag.
    pub to_update: Vec<AccessEntry>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty()
    }
}

/// Parse raw role identifiers as submitted by a caller (e.g. a form with
/// one checkbox per role). Blank entries are dropped; anything else must be
/// an integer id.
pub fn parse_role_ids<S: AsRef<str>>(raw: &[S]) -> Result<HashSet<RoleId>, AccessError> {
    raw.iter()
        .map(|s| s.as_ref())
        .filter(|s| !s.trim().is_empty())
        .map(str::parse::<RoleId>)
        .collect()
}

/// Compute the plan without touching any state.
///
/// Every non-superuser role in `catalog` that has no entry yet gets one.
/// Every entry ends up readable iff its role id is in `desired`. Superuser
/// roles never get an entry, whether or not they are desired.
pub fn reconcile(
    existing: &[AccessEntry],
    catalog: &[Role],
    desired: &HashSet<RoleId>,
) -> ReconcilePlan {
    let mut covered: HashSet<RoleId> = existing.iter().map(AccessEntry::role_id).collect();
    let mut plan = ReconcilePlan::default();

    for role in catalog.iter().filter(|r| !r.superuser) {
        if covered.insert(role.id) {
            plan.to_create
                .push(AccessEntry::new(role.clone(), desired.contains(&role.id)));
        }
    }

    for entry in existing {
        let can_read = desired.contains(&entry.role_id());
        if entry.can_read != can_read {
            plan.to_update
                .push(AccessEntry::new(entry.role.clone(), can_read));
        }
    }

    plan
}
