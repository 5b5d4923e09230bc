use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "actions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub request_id: Option<String>,
    pub author: Option<String>,
    /// Wire name of the action kind (`PUSH`, `PULL_REQUEST`, `MERGE`).
    pub action: String,
    pub from_branch: Option<String>,
    pub to_branch: Option<String>,
    pub timestamp: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
