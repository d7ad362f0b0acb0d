//! Migration: users, workspaces and the membership table joining them.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub(super) enum Users {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    HashedPassword,
    Created,
}

#[derive(Iden)]
pub(super) enum Workspaces {
    Table,
    Id,
    Title,
    Description,
    Created,
}

#[derive(Iden)]
enum UsersWorkspaces {
    Table,
    UserId,
    WorkspaceId,
    Role,
    Created,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::FirstName).string_len(255).not_null())
                    .col(ColumnDef::new(Users::LastName).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::HashedPassword).string().not_null())
                    .col(
                        ColumnDef::new(Users::Created)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Workspaces::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Workspaces::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Workspaces::Title).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Workspaces::Description)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Workspaces::Created)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UsersWorkspaces::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UsersWorkspaces::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(UsersWorkspaces::WorkspaceId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UsersWorkspaces::Role).string_len(10).not_null())
                    .col(
                        ColumnDef::new(UsersWorkspaces::Created)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(UsersWorkspaces::UserId)
                            .col(UsersWorkspaces::WorkspaceId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_workspaces_user")
                            .from(UsersWorkspaces::Table, UsersWorkspaces::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_workspaces_workspace")
                            .from(UsersWorkspaces::Table, UsersWorkspaces::WorkspaceId)
                            .to(Workspaces::Table, Workspaces::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_workspaces_workspace_id")
                    .table(UsersWorkspaces::Table)
                    .col(UsersWorkspaces::WorkspaceId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UsersWorkspaces::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Workspaces::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}
