//! Workspace database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Workspace;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "workspaces")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: String,
    pub created: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Workspace {
    fn from(model: Model) -> Self {
        Workspace {
            id: model.id,
            title: model.title,
            description: model.description,
            created: model.created,
        }
    }
}
