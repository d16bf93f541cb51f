use std::collections::{BTreeSet, HashSet};

use crate::access::errors::AccessError;
use crate::access::reconcile::{reconcile, ReconcilePlan};
use crate::access::types::{AccessEntry, Role, RoleId};

/// The access entries of a single page.
///
/// Holds at most one entry per role id and never an entry for a superuser
/// role. Entries are only ever added or re-flagged, never removed; they go
/// away together with the page.
#[derive(Debug, Clone)]
pub struct PageAccess {
    page_id: i32,
    entries: Vec<AccessEntry>,
}

impl PageAccess {
    pub fn new(page_id: i32) -> Self {
        Self {
            page_id,
            entries: Vec::new(),
        }
    }

    /// Build from previously persisted entries, checking the invariants.
    pub fn from_entries(
        page_id: i32,
        entries: impl IntoIterator<Item = AccessEntry>,
    ) -> Result<Self, AccessError> {
        let mut access = Self::new(page_id);
        for entry in entries {
            access.insert(entry)?;
        }
        Ok(access)
    }

    pub fn page_id(&self) -> i32 {
        self.page_id
    }

    pub fn entries(&self) -> &[AccessEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry_for(&self, role_id: RoleId) -> Option<&AccessEntry> {
        self.entries.iter().find(|e| e.role_id() == role_id)
    }

    /// Append an entry.
    pub fn insert(&mut self, entry: AccessEntry) -> Result<(), AccessError> {
        if entry.role.superuser {
            return Err(AccessError::SuperuserEntry {
                page_id: self.page_id,
                role_id: entry.role_id().0,
            });
        }
        if self.entry_for(entry.role_id()).is_some() {
            return Err(AccessError::DuplicateEntry {
                page_id: self.page_id,
                role_id: entry.role_id().0,
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Roles whose entry on this page is marked readable.
    pub fn readable_roles(&self) -> impl Iterator<Item = &Role> {
        self.entries.iter().filter(|e| e.can_read).map(|e| &e.role)
    }

    pub fn readable_role_ids(&self) -> BTreeSet<RoleId> {
        self.readable_roles().map(|r| r.id).collect()
    }

    /// Apply a plan computed by [`reconcile`] against this page.
    pub fn apply(&mut self, plan: &ReconcilePlan) -> Result<(), AccessError> {
        for entry in &plan.to_create {
            self.insert(entry.clone())?;
        }
        for update in &plan.to_update {
            if let Some(existing) = self
                .entries
                .iter_mut()
                .find(|e| e.role_id() == update.role_id())
            {
                existing.can_read = update.can_read;
            }
        }
        Ok(())
    }

    /// Make exactly the `desired` roles readable, covering every
    /// non-superuser role of `catalog`. Returns the changes made so the
    /// caller can persist them.
    pub fn set_readable_roles(
        &mut self,
        catalog: &[Role],
        desired: &HashSet<RoleId>,
    ) -> Result<ReconcilePlan, AccessError> {
        let plan = reconcile(&self.entries, catalog, desired);
        self.apply(&plan)?;
        Ok(plan)
    }
}
