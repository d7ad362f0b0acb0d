//! Membership (users_workspaces) entity: which user belongs to which
//! workspace, and with what role.

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::SelectStatement;
use sea_orm::{QueryFilter, QuerySelect, QueryTrait};

use crate::domain::WorkspaceRole;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users_workspaces")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub workspace_id: i32,
    /// "ADMIN" or "MEMBER"
    pub role: String,
    pub created: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::workspace::Entity",
        from = "Column::WorkspaceId",
        to = "super::workspace::Column::Id",
        on_delete = "Cascade"
    )]
    Workspace,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::workspace::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workspace.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// `SELECT workspace_id FROM users_workspaces WHERE user_id = ? [AND role = ?]`
///
/// Used as an IN-subquery by the access checks and workspace listings.
pub fn workspace_ids_of(user_id: i32, role: Option<WorkspaceRole>) -> SelectStatement {
    let mut query = Entity::find()
        .select_only()
        .column(Column::WorkspaceId)
        .filter(Column::UserId.eq(user_id));

    if let Some(role) = role {
        query = query.filter(Column::Role.eq(role.as_str()));
    }

    query.into_query()
}

/// `SELECT user_id FROM users_workspaces WHERE workspace_id = ?`
pub fn user_ids_in(workspace_id: i32) -> SelectStatement {
    Entity::find()
        .select_only()
        .column(Column::UserId)
        .filter(Column::WorkspaceId.eq(workspace_id))
        .into_query()
}
