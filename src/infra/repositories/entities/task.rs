//! Task database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Task;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    /// Free text; LOW/MEDIUM/HIGH is enforced at the request boundary only
    pub priority: String,
    pub created: DateTimeUtc,
    pub finished: Option<DateTimeUtc>,
    pub workspace_id: i32,
    pub user_id: i32,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workspace::Entity",
        from = "Column::WorkspaceId",
        to = "super::workspace::Column::Id"
    )]
    Workspace,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::workspace::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workspace.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Task {
    fn from(model: Model) -> Self {
        Task {
            id: model.id,
            title: model.title,
            content: model.content,
            priority: model.priority,
            status: model.status,
            created: model.created,
            finished: model.finished,
            workspace_id: model.workspace_id,
            user_id: model.user_id,
        }
    }
}
