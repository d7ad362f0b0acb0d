//! Workspace service - workspaces, their members and the per-user limits.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::{MAX_MEMBER_WORKSPACES, MAX_OWNED_WORKSPACES};
use crate::domain::{User, Workspace, WorkspaceMember, WorkspaceRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Workspaces visible to one user, split by role
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WorkspaceOverview {
    /// Workspaces the user administers
    pub owned: Vec<Workspace>,
    /// Workspaces the user was added to as a member
    pub invited: Vec<Workspace>,
    /// False once the user administers the maximum number of workspaces
    pub can_create: bool,
}

/// Workspace service trait for dependency injection.
#[async_trait]
pub trait WorkspaceService: Send + Sync {
    /// Create a workspace owned by `user_id`
    async fn create(&self, user_id: i32, title: String, description: String) -> AppResult<i32>;

    async fn list(&self, user_id: i32) -> AppResult<WorkspaceOverview>;

    async fn get(&self, id: i32) -> AppResult<Workspace>;

    async fn update(&self, id: i32, title: String, description: String) -> AppResult<()>;

    /// Delete the workspace with all of its tasks
    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn members(&self, id: i32) -> AppResult<Vec<WorkspaceMember>>;

    /// Look up a user that can still be added to the workspace
    async fn find_invitee(&self, workspace_id: i32, email: &str) -> AppResult<User>;

    /// Add `user_id` as a MEMBER on behalf of `acting_user_id`
    async fn add_member(&self, workspace_id: i32, acting_user_id: i32, user_id: i32)
        -> AppResult<()>;

    async fn remove_member(&self, workspace_id: i32, user_id: i32) -> AppResult<()>;

    async fn is_member(&self, user_id: i32, workspace_id: i32) -> AppResult<bool>;

    async fn is_admin(&self, user_id: i32, workspace_id: i32) -> AppResult<bool>;
}

/// Concrete implementation of WorkspaceService using Unit of Work.
pub struct WorkspaceManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> WorkspaceManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn ensure_can_join(&self, email: &str) -> AppResult<()> {
        let joined = self.uow.users().workspaces_as_member_count(email).await?;
        if joined >= MAX_MEMBER_WORKSPACES {
            return Err(AppError::conflict("User exceeds workspace limit"));
        }
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> WorkspaceService for WorkspaceManager<U> {
    async fn create(&self, user_id: i32, title: String, description: String) -> AppResult<i32> {
        let owned = self
            .uow
            .workspaces()
            .count_by_role(user_id, WorkspaceRole::Admin)
            .await?;

        if owned >= MAX_OWNED_WORKSPACES {
            return Err(AppError::conflict(format!(
                "You can own at most {} workspaces",
                MAX_OWNED_WORKSPACES
            )));
        }

        let id = self
            .uow
            .workspaces()
            .insert(title, description, user_id)
            .await?;

        tracing::info!(workspace_id = id, user_id, "Workspace created");
        Ok(id)
    }

    async fn list(&self, user_id: i32) -> AppResult<WorkspaceOverview> {
        let workspaces = self.uow.workspaces();
        let owned = workspaces.get_all(user_id, WorkspaceRole::Admin).await?;
        let invited = workspaces.get_all(user_id, WorkspaceRole::Member).await?;

        Ok(WorkspaceOverview {
            can_create: (owned.len() as u64) < MAX_OWNED_WORKSPACES,
            owned,
            invited,
        })
    }

    async fn get(&self, id: i32) -> AppResult<Workspace> {
        self.uow.workspaces().get(id).await
    }

    async fn update(&self, id: i32, title: String, description: String) -> AppResult<()> {
        self.uow.workspaces().update(id, title, description).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let rows = self.uow.workspaces().delete(id).await?;
        if rows == 0 {
            return Err(AppError::NotFound);
        }

        tracing::info!(workspace_id = id, "Workspace deleted");
        Ok(())
    }

    async fn members(&self, id: i32) -> AppResult<Vec<WorkspaceMember>> {
        self.uow.users().workspace_members(id).await
    }

    async fn find_invitee(&self, workspace_id: i32, email: &str) -> AppResult<User> {
        let user = self
            .uow
            .users()
            .get_user_to_invite(email, workspace_id)
            .await?;

        self.ensure_can_join(email).await?;
        Ok(user)
    }

    async fn add_member(
        &self,
        workspace_id: i32,
        acting_user_id: i32,
        user_id: i32,
    ) -> AppResult<()> {
        if acting_user_id == user_id {
            return Err(AppError::bad_request("You are already part of this workspace"));
        }

        let user = match self.uow.users().get(user_id).await {
            Err(AppError::NotFound) => {
                return Err(AppError::validation("User does not exist"));
            }
            other => other?,
        };
        self.ensure_can_join(&user.email).await?;

        self.uow
            .users()
            .add_to_workspace(user_id, workspace_id)
            .await?;

        tracing::info!(workspace_id, user_id, "Member added");
        Ok(())
    }

    async fn remove_member(&self, workspace_id: i32, user_id: i32) -> AppResult<()> {
        let rows = self
            .uow
            .users()
            .remove_from_workspace(workspace_id, user_id)
            .await?;

        if rows == 0 {
            return Err(AppError::NotFound);
        }

        tracing::info!(workspace_id, user_id, "Member removed");
        Ok(())
    }

    async fn is_member(&self, user_id: i32, workspace_id: i32) -> AppResult<bool> {
        self.uow
            .workspaces()
            .validate_ownership(user_id, workspace_id)
            .await
    }

    async fn is_admin(&self, user_id: i32, workspace_id: i32) -> AppResult<bool> {
        self.uow.workspaces().validate_admin(user_id, workspace_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{test_user, test_workspace, TestUnitOfWork};
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_create_makes_workspace_for_creator() {
        let uow = TestUnitOfWork::default().with_workspaces(|repo| {
            repo.expect_count_by_role()
                .with(eq(1), eq(WorkspaceRole::Admin))
                .returning(|_, _| Ok(2));
            repo.expect_insert()
                .withf(|title, description, creator| {
                    title == "Ops" && description == "On-call" && *creator == 1
                })
                .returning(|_, _, _| Ok(10));
        });

        let service = WorkspaceManager::new(Arc::new(uow));
        let id = service
            .create(1, "Ops".to_string(), "On-call".to_string())
            .await
            .unwrap();

        assert_eq!(id, 10);
    }

    #[tokio::test]
    async fn test_create_rejected_at_owned_limit() {
        let uow = TestUnitOfWork::default().with_workspaces(|repo| {
            repo.expect_count_by_role()
                .returning(|_, _| Ok(MAX_OWNED_WORKSPACES));
            repo.expect_insert().never();
        });

        let service = WorkspaceManager::new(Arc::new(uow));
        let result = service
            .create(1, "Ops".to_string(), "On-call".to_string())
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_list_splits_by_role() {
        let uow = TestUnitOfWork::default().with_workspaces(|repo| {
            repo.expect_get_all()
                .with(eq(1), eq(WorkspaceRole::Admin))
                .returning(|_, _| Ok((1..=6).map(test_workspace).collect()));
            repo.expect_get_all()
                .with(eq(1), eq(WorkspaceRole::Member))
                .returning(|_, _| Ok(vec![test_workspace(20)]));
        });

        let service = WorkspaceManager::new(Arc::new(uow));
        let overview = service.list(1).await.unwrap();

        assert_eq!(overview.owned.len(), 6);
        assert_eq!(overview.invited.len(), 1);
        assert!(!overview.can_create);
    }

    #[tokio::test]
    async fn test_delete_zero_rows_is_not_found() {
        let uow = TestUnitOfWork::default().with_workspaces(|repo| {
            repo.expect_delete().with(eq(99)).returning(|_| Ok(0));
        });

        let service = WorkspaceManager::new(Arc::new(uow));
        let result = service.delete(99).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_find_invitee_respects_member_limit() {
        let uow = TestUnitOfWork::default().with_users(|repo| {
            repo.expect_get_user_to_invite()
                .returning(|_, _| Ok(test_user(2)));
            repo.expect_workspaces_as_member_count()
                .returning(|_| Ok(MAX_MEMBER_WORKSPACES));
        });

        let service = WorkspaceManager::new(Arc::new(uow));
        let result = service.find_invitee(1, "user2@example.com").await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_find_invitee_unknown_or_already_added() {
        let uow = TestUnitOfWork::default().with_users(|repo| {
            repo.expect_get_user_to_invite()
                .returning(|_, _| Err(AppError::NotFound));
            repo.expect_workspaces_as_member_count().never();
        });

        let service = WorkspaceManager::new(Arc::new(uow));
        let result = service.find_invitee(1, "ghost@example.com").await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_cannot_add_yourself() {
        let uow = TestUnitOfWork::default().with_users(|repo| {
            repo.expect_add_to_workspace().never();
        });

        let service = WorkspaceManager::new(Arc::new(uow));
        let result = service.add_member(1, 5, 5).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_add_member() {
        let uow = TestUnitOfWork::default().with_users(|repo| {
            repo.expect_get().with(eq(2)).returning(|id| Ok(test_user(id)));
            repo.expect_workspaces_as_member_count()
                .with(eq("user2@example.com"))
                .returning(|_| Ok(1));
            repo.expect_add_to_workspace()
                .with(eq(2), eq(1))
                .times(1)
                .returning(|_, _| Ok(()));
        });

        let service = WorkspaceManager::new(Arc::new(uow));
        service.add_member(1, 5, 2).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_missing_member_is_not_found() {
        let uow = TestUnitOfWork::default().with_users(|repo| {
            repo.expect_remove_from_workspace().returning(|_, _| Ok(0));
        });

        let service = WorkspaceManager::new(Arc::new(uow));
        let result = service.remove_member(1, 2).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
