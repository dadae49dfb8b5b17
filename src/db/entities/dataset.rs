//! Dataset entity

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "datasets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub hash: String,         // 64-char hex SHA256, immutable identity
    pub name: String,         // display name, the original filename
    pub source: Option<String>,
    pub registry_path: String, // object name in the remote store
    pub created_at: i64,
    pub is_active: bool,      // flips to false exactly once, on deregistration
    pub size_bytes: Option<i64>,
    pub download_count: i64,
    pub last_downloaded_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::local_copy::Entity")]
    LocalCopies,
}

impl Related<super::local_copy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LocalCopies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
