//! Migration: tasks.
//!
//! The workspace foreign key has no ON DELETE action, so a workspace with
//! tasks can only be removed after its tasks.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_workspace_tables::{Users, Workspaces};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Tasks {
    Table,
    Id,
    Title,
    Content,
    Priority,
    Created,
    Finished,
    WorkspaceId,
    UserId,
    Status,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tasks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tasks::Title).string_len(100).not_null())
                    .col(ColumnDef::new(Tasks::Content).text().not_null())
                    .col(ColumnDef::new(Tasks::Priority).string_len(10).not_null())
                    .col(
                        ColumnDef::new(Tasks::Created)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Tasks::Finished)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Tasks::WorkspaceId).integer().not_null())
                    .col(ColumnDef::new(Tasks::UserId).integer().not_null())
                    .col(ColumnDef::new(Tasks::Status).string_len(20).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_workspace")
                            .from(Tasks::Table, Tasks::WorkspaceId)
                            .to(Workspaces::Table, Workspaces::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_user")
                            .from(Tasks::Table, Tasks::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_workspace_id_created")
                    .table(Tasks::Table)
                    .col(Tasks::WorkspaceId)
                    .col(Tasks::Created)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await
    }
}
