//! Workspace repository: workspaces, their ADMIN creator, and the
//! cascading delete of a workspace together with its tasks.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::membership::{self, Entity as MembershipEntity};
use super::entities::task::{self, Entity as TaskEntity};
use super::entities::workspace::{self, ActiveModel, Entity as WorkspaceEntity};
use crate::domain::{Workspace, WorkspaceRole};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::unit_of_work::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Workspace repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    /// Create a workspace and make `creator_id` its ADMIN, atomically.
    async fn insert(&self, title: String, description: String, creator_id: i32) -> AppResult<i32>;

    async fn get(&self, id: i32) -> AppResult<Workspace>;

    /// Workspaces where `user_id` holds exactly `role`, oldest first
    async fn get_all(&self, user_id: i32, role: WorkspaceRole) -> AppResult<Vec<Workspace>>;

    async fn count_by_role(&self, user_id: i32, role: WorkspaceRole) -> AppResult<u64>;

    async fn update(&self, id: i32, title: String, description: String) -> AppResult<()>;

    /// Delete the workspace and all of its tasks. Returns the number of
    /// workspace rows removed (0 when it did not exist).
    async fn delete(&self, id: i32) -> AppResult<u64>;

    /// Whether `user_id` is part of the workspace in any role
    async fn validate_ownership(&self, user_id: i32, workspace_id: i32) -> AppResult<bool>;

    /// Whether `user_id` is an ADMIN of the workspace
    async fn validate_admin(&self, user_id: i32, workspace_id: i32) -> AppResult<bool>;
}

/// Concrete implementation of WorkspaceRepository
pub struct WorkspaceStore {
    db: DatabaseConnection,
}

impl WorkspaceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn has_membership(
        &self,
        user_id: i32,
        workspace_id: i32,
        role: Option<WorkspaceRole>,
    ) -> AppResult<bool> {
        let mut query = MembershipEntity::find()
            .filter(membership::Column::UserId.eq(user_id))
            .filter(membership::Column::WorkspaceId.eq(workspace_id));

        if let Some(role) = role {
            query = query.filter(membership::Column::Role.eq(role.as_str()));
        }

        Ok(query.count(&self.db).await? > 0)
    }
}

#[async_trait]
impl WorkspaceRepository for WorkspaceStore {
    async fn insert(&self, title: String, description: String, creator_id: i32) -> AppResult<i32> {
        with_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let now = chrono::Utc::now();

                let workspace = ActiveModel {
                    title: Set(title),
                    description: Set(description),
                    created: Set(now),
                    ..Default::default()
                };
                let workspace_id = WorkspaceEntity::insert(workspace)
                    .exec(txn)
                    .await?
                    .last_insert_id;

                let admin = membership::ActiveModel {
                    user_id: Set(creator_id),
                    workspace_id: Set(workspace_id),
                    role: Set(WorkspaceRole::Admin.into()),
                    created: Set(now),
                };
                MembershipEntity::insert(admin)
                    .exec_without_returning(txn)
                    .await?;

                Ok(workspace_id)
            })
        })
        .await
    }

    async fn get(&self, id: i32) -> AppResult<Workspace> {
        let model = WorkspaceEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?;

        Ok(Workspace::from(model))
    }

    async fn get_all(&self, user_id: i32, role: WorkspaceRole) -> AppResult<Vec<Workspace>> {
        let models = WorkspaceEntity::find()
            .filter(workspace::Column::Id.in_subquery(membership::workspace_ids_of(user_id, Some(role))))
            .order_by_asc(workspace::Column::Created)
            .order_by_asc(workspace::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Workspace::from).collect())
    }

    async fn count_by_role(&self, user_id: i32, role: WorkspaceRole) -> AppResult<u64> {
        let count = MembershipEntity::find()
            .filter(membership::Column::UserId.eq(user_id))
            .filter(membership::Column::Role.eq(role.as_str()))
            .count(&self.db)
            .await?;

        Ok(count)
    }

    async fn update(&self, id: i32, title: String, description: String) -> AppResult<()> {
        let changes = ActiveModel {
            title: Set(title),
            description: Set(description),
            ..Default::default()
        };

        let result = WorkspaceEntity::update_many()
            .set(changes)
            .filter(workspace::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: i32) -> AppResult<u64> {
        let task_count = TaskEntity::find()
            .filter(task::Column::WorkspaceId.eq(id))
            .count(&self.db)
            .await?;

        if task_count == 0 {
            let result = WorkspaceEntity::delete_by_id(id).exec(&self.db).await?;
            return Ok(result.rows_affected);
        }

        with_transaction(&self.db, move |txn| {
            Box::pin(async move {
                TaskEntity::delete_many()
                    .filter(task::Column::WorkspaceId.eq(id))
                    .exec(txn)
                    .await?;

                let result = WorkspaceEntity::delete_by_id(id).exec(txn).await?;
                Ok(result.rows_affected)
            })
        })
        .await
    }

    async fn validate_ownership(&self, user_id: i32, workspace_id: i32) -> AppResult<bool> {
        self.has_membership(user_id, workspace_id, None).await
    }

    async fn validate_admin(&self, user_id: i32, workspace_id: i32) -> AppResult<bool> {
        self.has_membership(user_id, workspace_id, Some(WorkspaceRole::Admin))
            .await
    }
}
