use crate::access::{AccessEntry, PageAccess, ReconcilePlan, Role, RoleId, User};
use crate::entities;
use crate::errors::PageRoleError;
use crate::settings::{Database as DbCfg, Roles as RolesCfg};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: i32,
    pub title: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRole {
    pub title: String,
    pub superuser: bool,
    pub anonymous: bool,
}

impl NewRole {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            superuser: false,
            anonymous: false,
        }
    }
}

/// The well-known roles, resolved from configuration.
#[derive(Debug, Clone)]
pub struct BuiltinRoles {
    pub anonymous: Role,
    pub superusers: Vec<Role>,
}

impl From<entities::role::Model> for Role {
    fn from(model: entities::role::Model) -> Self {
        Role {
            id: RoleId(model.id),
            title: model.title,
            superuser: model.superuser != 0,
            anonymous: model.anonymous != 0,
        }
    }
}

impl From<entities::page::Model> for Page {
    fn from(model: entities::page::Model) -> Self {
        Page {
            id: model.id,
            title: model.title,
            created_at: model.created_at,
        }
    }
}

pub async fn init(cfg: &DbCfg) -> Result<DatabaseConnection, PageRoleError> {
    let db = Database::connect(&cfg.url).await?;
    Ok(db)
}

// ---------- Roles ----------

pub async fn create_role<C: ConnectionTrait>(db: &C, input: NewRole) -> Result<Role, PageRoleError> {
    let role = entities::role::ActiveModel {
        id: Default::default(),
        title: Set(input.title),
        superuser: Set(input.superuser as i64),
        anonymous: Set(input.anonymous as i64),
    };

    Ok(role.insert(db).await?.into())
}

pub async fn get_role<C: ConnectionTrait>(
    db: &C,
    role_id: RoleId,
) -> Result<Option<Role>, PageRoleError> {
    use entities::role::Entity;

    Ok(Entity::find_by_id(role_id.0).one(db).await?.map(Role::from))
}

pub async fn get_role_by_title<C: ConnectionTrait>(
    db: &C,
    title: &str,
) -> Result<Option<Role>, PageRoleError> {
    use entities::role::{Column, Entity};

    Ok(Entity::find()
        .filter(Column::Title.eq(title))
        .one(db)
        .await?
        .map(Role::from))
}

/// The whole role catalog, ordered by id.
pub async fn list_roles<C: ConnectionTrait>(db: &C) -> Result<Vec<Role>, PageRoleError> {
    use entities::role::{Column, Entity};

    Ok(Entity::find()
        .order_by_asc(Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(Role::from)
        .collect())
}

pub async fn non_superuser_roles<C: ConnectionTrait>(db: &C) -> Result<Vec<Role>, PageRoleError> {
    use entities::role::{Column, Entity};

    Ok(Entity::find()
        .filter(Column::Superuser.eq(0))
        .order_by_asc(Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(Role::from)
        .collect())
}

pub async fn superuser_roles<C: ConnectionTrait>(db: &C) -> Result<Vec<Role>, PageRoleError> {
    use entities::role::{Column, Entity};

    Ok(Entity::find()
        .filter(Column::Superuser.ne(0))
        .order_by_asc(Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(Role::from)
        .collect())
}

/// The role standing in for unauthenticated actors.
pub async fn anonymous_role<C: ConnectionTrait>(db: &C) -> Result<Role, PageRoleError> {
    use entities::role::{Column, Entity};

    Entity::find()
        .filter(Column::Anonymous.ne(0))
        .order_by_asc(Column::Id)
        .one(db)
        .await?
        .map(Role::from)
        .ok_or_else(|| PageRoleError::NotFound("anonymous role".to_string()))
}

/// Make sure the configured anonymous and superuser roles exist and carry
/// the matching flag. Safe to run on every startup.
pub async fn ensure_builtin_roles(
    db: &DatabaseConnection,
    cfg: &RolesCfg,
) -> Result<BuiltinRoles, PageRoleError> {
    let txn = db.begin().await?;

    let anonymous = ensure_role(
        &txn,
        NewRole {
            title: cfg.anonymous.clone(),
            superuser: false,
            anonymous: true,
        },
    )
    .await?;

    let mut superusers = Vec::with_capacity(cfg.superusers.len());
    for title in &cfg.superusers {
        let role = ensure_role(
            &txn,
            NewRole {
                title: title.clone(),
                superuser: true,
                anonymous: false,
            },
        )
        .await?;
        superusers.push(role);
    }

    txn.commit().await?;

    Ok(BuiltinRoles {
        anonymous,
        superusers,
    })
}

async fn ensure_role<C: ConnectionTrait>(db: &C, wanted: NewRole) -> Result<Role, PageRoleError> {
    use entities::role::{Column, Entity};

    let Some(model) = Entity::find()
        .filter(Column::Title.eq(wanted.title.as_str()))
        .one(db)
        .await?
    else {
        tracing::info!(title = %wanted.title, superuser = wanted.superuser, anonymous = wanted.anonymous, "Created built-in role");
        return create_role(db, wanted).await;
    };

    let superuser = model.superuser != 0 || wanted.superuser;
    let anonymous = model.anonymous != 0 || wanted.anonymous;
    if superuser == (model.superuser != 0) && anonymous == (model.anonymous != 0) {
        return Ok(model.into());
    }

    let became_superuser = superuser && model.superuser == 0;
    let mut active: entities::role::ActiveModel = model.into();
    active.superuser = Set(superuser as i64);
    active.anonymous = Set(anonymous as i64);
    let updated = active.update(db).await?;
    tracing::info!(title = %updated.title, superuser, anonymous, "Flagged existing role as built-in");

    // Superusers never carry page access entries
    if became_superuser {
        let removed = entities::page_role::Entity::delete_many()
            .filter(entities::page_role::Column::RoleId.eq(updated.id))
            .exec(db)
            .await?;
        if removed.rows_affected > 0 {
            tracing::info!(
                title = %updated.title,
                entries = removed.rows_affected,
                "Removed page access entries of new superuser role"
            );
        }
    }

    Ok(updated.into())
}

// ---------- Pages ----------

pub async fn create_page<C: ConnectionTrait>(db: &C, title: &str) -> Result<Page, PageRoleError> {
    let page = entities::page::ActiveModel {
        id: Default::default(),
        title: Set(title.to_string()),
        created_at: Set(Utc::now().timestamp()),
    };

    Ok(page.insert(db).await?.into())
}

pub async fn get_page<C: ConnectionTrait>(db: &C, page_id: i32) -> Result<Option<Page>, PageRoleError> {
    use entities::page::Entity;

    Ok(Entity::find_by_id(page_id).one(db).await?.map(Page::from))
}

/// Delete a page together with all of its access entries.
pub async fn delete_page(db: &DatabaseConnection, page_id: i32) -> Result<(), PageRoleError> {
    let txn = db.begin().await?;

    entities::page_role::Entity::delete_many()
        .filter(entities::page_role::Column::PageId.eq(page_id))
        .exec(&txn)
        .await?;

    let result = entities::page::Entity::delete_by_id(page_id)
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        return Err(PageRoleError::NotFound(format!("page {page_id}")));
    }

    txn.commit().await?;
    Ok(())
}

// ---------- Page access entries ----------

/// Load the access entries of a page. Fails if the page does not exist.
pub async fn load_page_access<C: ConnectionTrait>(
    db: &C,
    page_id: i32,
) -> Result<PageAccess, PageRoleError> {
    use entities::page_role::{Column, Entity};

    if get_page(db, page_id).await?.is_none() {
        return Err(PageRoleError::NotFound(format!("page {page_id}")));
    }

    let rows = Entity::find()
        .filter(Column::PageId.eq(page_id))
        .order_by_asc(Column::Id)
        .find_also_related(entities::role::Entity)
        .all(db)
        .await?;

    let mut entries = Vec::with_capacity(rows.len());
    for (entry, role) in rows {
        let role = role.ok_or_else(|| PageRoleError::NotFound(format!("role {}", entry.role_id)))?;
        if role.superuser != 0 {
            tracing::warn!(
                page_id,
                role_id = role.id,
                "Ignoring stored access entry of superuser role"
            );
            continue;
        }
        entries.push(AccessEntry::new(role.into(), entry.can_read != 0));
    }

    Ok(PageAccess::from_entries(page_id, entries)?)
}

/// Write a reconcile plan for `page_id`.
///
/// New entries are upserted on (page_id, role_id), so two reconciliations
/// racing on the same page converge instead of duplicating rows. Run it in a
/// transaction together with the load that produced the plan.
pub async fn persist_plan<C: ConnectionTrait>(
    db: &C,
    page_id: i32,
    plan: &ReconcilePlan,
) -> Result<(), PageRoleError> {
    use entities::page_role::{ActiveModel, Column, Entity};
    use sea_orm::sea_query::{Expr, OnConflict};

    if !plan.to_create.is_empty() {
        let rows = plan.to_create.iter().map(|entry| ActiveModel {
            id: Default::default(),
            page_id: Set(page_id),
            role_id: Set(entry.role_id().0),
            can_read: Set(entry.can_read as i64),
        });

        Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([Column::PageId, Column::RoleId])
                    .update_column(Column::CanRead)
                    .to_owned(),
            )
            .exec(db)
            .await?;
    }

    for entry in &plan.to_update {
        Entity::update_many()
            .col_expr(Column::CanRead, Expr::value(entry.can_read as i64))
            .filter(Column::PageId.eq(page_id))
            .filter(Column::RoleId.eq(entry.role_id().0))
            .exec(db)
            .await?;
    }

    Ok(())
}

// ---------- Users ----------

pub async fn create_user<C: ConnectionTrait>(db: &C, username: &str) -> Result<User, PageRoleError> {
    let user = entities::user::ActiveModel {
        id: Default::default(),
        username: Set(username.to_string()),
        created_at: Set(Utc::now().timestamp()),
    };
    let model = user.insert(db).await?;

    Ok(User::new(model.id, &model.username, Vec::new()))
}

pub async fn assign_role<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    role_id: RoleId,
) -> Result<(), PageRoleError> {
    use entities::user_role::{ActiveModel, Column, Entity};
    use sea_orm::sea_query::OnConflict;

    let row = ActiveModel {
        user_id: Set(user_id),
        role_id: Set(role_id.0),
    };

    Entity::insert(row)
        .on_conflict(
            OnConflict::columns([Column::UserId, Column::RoleId])
                .do_nothing()
                .to_owned(),
        )
        .do_nothing()
        .exec(db)
        .await?;

    Ok(())
}

pub async fn user_roles<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<Vec<Role>, PageRoleError> {
    use entities::user_role::{Column, Entity};

    let role_ids: Vec<i32> = Entity::find()
        .filter(Column::UserId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|row| row.role_id)
        .collect();

    if role_ids.is_empty() {
        return Ok(Vec::new());
    }

    Ok(entities::role::Entity::find()
        .filter(entities::role::Column::Id.is_in(role_ids))
        .order_by_asc(entities::role::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(Role::from)
        .collect())
}

/// Load a user with its roles.
pub async fn get_user<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<Option<User>, PageRoleError> {
    let Some(model) = entities::user::Entity::find_by_id(user_id).one(db).await? else {
        return Ok(None);
    };
    let roles = user_roles(db, user_id).await?;

    Ok(Some(User::new(model.id, &model.username, roles)))
}

/// Resolve the actor of a request: `None` for an unauthenticated caller,
/// otherwise the user with its roles. An unknown user id is `NotFound`.
pub async fn load_actor<C: ConnectionTrait>(
    db: &C,
    user_id: Option<i32>,
) -> Result<Option<User>, PageRoleError> {
    let Some(id) = user_id else {
        return Ok(None);
    };

    get_user(db, id)
        .await?
        .map(Some)
        .ok_or_else(|| PageRoleError::NotFound(format!("user {id}")))
}
