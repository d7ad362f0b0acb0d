//! User repository: accounts and workspace membership rows.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set, SqlErr,
};

use super::entities::membership::{self, Entity as MembershipEntity};
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{User, WorkspaceMember, WorkspaceRole};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user, returning its id. A taken email yields `DuplicateEmail`.
    async fn insert(
        &self,
        first_name: String,
        last_name: String,
        email: String,
        password_hash: String,
    ) -> AppResult<i32>;

    async fn get(&self, id: i32) -> AppResult<User>;

    async fn get_by_email(&self, email: &str) -> AppResult<User>;

    async fn exists(&self, id: i32) -> AppResult<bool>;

    /// A user with `email` who is not yet part of `workspace_id`
    async fn get_user_to_invite(&self, email: &str, workspace_id: i32) -> AppResult<User>;

    /// Number of workspaces the user with `email` joined as MEMBER
    async fn workspaces_as_member_count(&self, email: &str) -> AppResult<u64>;

    /// Add `user_id` to `workspace_id` with the MEMBER role
    async fn add_to_workspace(&self, user_id: i32, workspace_id: i32) -> AppResult<()>;

    async fn remove_from_workspace(&self, workspace_id: i32, user_id: i32) -> AppResult<u64>;

    /// Members of a workspace with their role, in joining order
    async fn workspace_members(&self, workspace_id: i32) -> AppResult<Vec<WorkspaceMember>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn insert(
        &self,
        first_name: String,
        last_name: String,
        email: String,
        password_hash: String,
    ) -> AppResult<i32> {
        let active_model = ActiveModel {
            first_name: Set(first_name),
            last_name: Set(last_name),
            email: Set(email),
            hashed_password: Set(password_hash),
            created: Set(chrono::Utc::now()),
            ..Default::default()
        };

        let result = UserEntity::insert(active_model)
            .exec(&self.db)
            .await
            .map_err(|e| on_unique_violation(e, AppError::DuplicateEmail))?;

        Ok(result.last_insert_id)
    }

    async fn get(&self, id: i32) -> AppResult<User> {
        let model = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?;

        Ok(User::from(model))
    }

    async fn get_by_email(&self, email: &str) -> AppResult<User> {
        let model = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .ok_or_not_found()?;

        Ok(User::from(model))
    }

    async fn exists(&self, id: i32) -> AppResult<bool> {
        let count = UserEntity::find_by_id(id).count(&self.db).await?;
        Ok(count > 0)
    }

    async fn get_user_to_invite(&self, email: &str, workspace_id: i32) -> AppResult<User> {
        let model = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .filter(user::Column::Id.not_in_subquery(membership::user_ids_in(workspace_id)))
            .one(&self.db)
            .await?
            .ok_or_not_found()?;

        Ok(User::from(model))
    }

    async fn workspaces_as_member_count(&self, email: &str) -> AppResult<u64> {
        let users_with_email = UserEntity::find()
            .select_only()
            .column(user::Column::Id)
            .filter(user::Column::Email.eq(email))
            .into_query();

        let count = MembershipEntity::find()
            .filter(membership::Column::Role.eq(WorkspaceRole::Member.as_str()))
            .filter(membership::Column::UserId.in_subquery(users_with_email))
            .count(&self.db)
            .await?;

        Ok(count)
    }

    async fn add_to_workspace(&self, user_id: i32, workspace_id: i32) -> AppResult<()> {
        let active_model = membership::ActiveModel {
            user_id: Set(user_id),
            workspace_id: Set(workspace_id),
            role: Set(WorkspaceRole::Member.into()),
            created: Set(chrono::Utc::now()),
        };

        MembershipEntity::insert(active_model)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                on_unique_violation(e, AppError::conflict("User is already a member"))
            })?;

        Ok(())
    }

    async fn remove_from_workspace(&self, workspace_id: i32, user_id: i32) -> AppResult<u64> {
        let result = MembershipEntity::delete_many()
            .filter(membership::Column::WorkspaceId.eq(workspace_id))
            .filter(membership::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn workspace_members(&self, workspace_id: i32) -> AppResult<Vec<WorkspaceMember>> {
        let rows = MembershipEntity::find()
            .filter(membership::Column::WorkspaceId.eq(workspace_id))
            .order_by_asc(membership::Column::Created)
            .order_by_asc(membership::Column::UserId)
            .find_also_related(UserEntity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(membership, user)| {
                user.map(|user| WorkspaceMember {
                    id: user.id,
                    first_name: user.first_name,
                    last_name: user.last_name,
                    email: user.email,
                    role: WorkspaceRole::from(membership.role.as_str()),
                })
            })
            .collect())
    }
}

/// Map a unique/primary key violation to `on_conflict`, anything else to a database error.
fn on_unique_violation(err: DbErr, on_conflict: AppError) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => on_conflict,
        _ => AppError::from(err),
    }
}
