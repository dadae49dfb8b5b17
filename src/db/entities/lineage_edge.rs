//! Lineage edge entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "lineage_edges")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub parent_hash: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub child_hash: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::dataset::Entity",
        from = "Column::ParentHash",
        to = "super::dataset::Column::Hash"
    )]
    Parent,
    #[sea_orm(
        belongs_to = "super::dataset::Entity",
        from = "Column::ChildHash",
        to = "super::dataset::Column::Hash"
    )]
    Child,
}

impl ActiveModelBehavior for ActiveModel {}
