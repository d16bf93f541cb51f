use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::access::{parse_role_ids, Authorizer, ReconcilePlan, Role, RoleId};
use crate::errors::PageRoleError;
use crate::storage;

/// Caller-facing page access API, backed by the database.
#[derive(Debug, Clone)]
pub struct PageAccessService {
    db: DatabaseConnection,
    authorizer: Authorizer,
}

impl PageAccessService {
    pub fn new(db: DatabaseConnection, anonymous: Role) -> Self {
        Self {
            db,
            authorizer: Authorizer::new(anonymous),
        }
    }

    /// Build the service with the anonymous role stored in the database.
    pub async fn connect(db: DatabaseConnection) -> Result<Self, PageRoleError> {
        let anonymous = storage::anonymous_role(&db).await?;
        Ok(Self::new(db, anonymous))
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn authorizer(&self) -> &Authorizer {
        &self.authorizer
    }

    /// Make exactly the given roles readable on the page. `role_ids` are raw
    /// identifiers; blank ones are skipped, malformed ones rejected before
    /// anything is written. Returns the changes that were persisted.
    pub async fn set_readable_roles<S: AsRef<str>>(
        &self,
        page_id: i32,
        role_ids: &[S],
    ) -> Result<ReconcilePlan, PageRoleError> {
        let desired = parse_role_ids(role_ids)?;

        let txn = self.db.begin().await?;
        let mut access = storage::load_page_access(&txn, page_id).await?;
        let catalog = storage::list_roles(&txn).await?;
        let plan = access.set_readable_roles(&catalog, &desired)?;
        storage::persist_plan(&txn, page_id, &plan).await?;
        txn.commit().await?;

        tracing::info!(
            page_id,
            readable = desired.len(),
            created = plan.to_create.len(),
            updated = plan.to_update.len(),
            "Reconciled readable roles"
        );
        Ok(plan)
    }

    /// Can the user (or an unauthenticated actor for `None`) perform
    /// `action` on the page? Only `"read"` is supported.
    pub async fn can_read(
        &self,
        page_id: i32,
        user_id: Option<i32>,
        action: &str,
    ) -> Result<bool, PageRoleError> {
        let access = storage::load_page_access(&self.db, page_id).await?;
        let user = storage::load_actor(&self.db, user_id).await?;

        let allowed = self.authorizer.can_read(&access, user.as_ref(), action)?;
        tracing::debug!(page_id, ?user_id, action, allowed, "Page access check");
        Ok(allowed)
    }

    pub async fn is_readable_by_role(
        &self,
        page_id: i32,
        role_id: RoleId,
    ) -> Result<bool, PageRoleError> {
        let access = storage::load_page_access(&self.db, page_id).await?;
        let role = storage::get_role(&self.db, role_id)
            .await?
            .ok_or_else(|| PageRoleError::NotFound(format!("role {role_id}")))?;

        let allowed = self.authorizer.is_readable_by_role(&access, &role);
        tracing::debug!(page_id, %role_id, allowed, "Role access check");
        Ok(allowed)
    }

    /// Ids of the roles currently marked readable on the page.
    pub async fn readable_role_ids(&self, page_id: i32) -> Result<Vec<RoleId>, PageRoleError> {
        let access = storage::load_page_access(&self.db, page_id).await?;
        Ok(access.readable_role_ids().into_iter().collect())
    }
}
