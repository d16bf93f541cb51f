use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub title: String,
    pub superuser: i64,
    pub anonymous: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::page_role::Entity")]
    PageRole,
}

impl Related<super::page_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PageRole.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
