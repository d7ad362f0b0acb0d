//! Task service - task lifecycle inside a workspace.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{SortDirection, Task, TaskChanges, TaskFilter};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

/// Fields supplied when creating a task
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub content: String,
    pub priority: String,
    /// Assignee; must belong to the workspace
    pub user_id: i32,
}

/// Task service trait for dependency injection.
#[async_trait]
pub trait TaskService: Send + Sync {
    async fn create_task(&self, workspace_id: i32, task: NewTask) -> AppResult<i32>;

    async fn get_task(&self, id: i32) -> AppResult<Task>;

    /// One page of a workspace's tasks with pagination metadata
    async fn list_tasks(
        &self,
        workspace_id: i32,
        filter: TaskFilter,
        order: SortDirection,
        page: PaginationParams,
    ) -> AppResult<Paginated<Task>>;

    async fn update_task(&self, id: i32, changes: TaskChanges) -> AppResult<()>;

    async fn delete_task(&self, id: i32) -> AppResult<()>;

    /// Whether the user belongs to the task's workspace
    async fn is_member(&self, user_id: i32, task_id: i32) -> AppResult<bool>;

    /// Whether the user administers the task's workspace
    async fn is_admin(&self, user_id: i32, task_id: i32) -> AppResult<bool>;
}

/// Concrete implementation of TaskService using Unit of Work.
pub struct TaskManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> TaskManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn ensure_assignable(&self, user_id: i32, workspace_id: i32) -> AppResult<()> {
        let is_member = self
            .uow
            .workspaces()
            .validate_ownership(user_id, workspace_id)
            .await?;

        if !is_member {
            return Err(AppError::validation(
                "Assignee must be a member of the workspace",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> TaskService for TaskManager<U> {
    async fn create_task(&self, workspace_id: i32, task: NewTask) -> AppResult<i32> {
        self.ensure_assignable(task.user_id, workspace_id).await?;

        let id = self
            .uow
            .tasks()
            .insert(task.title, task.content, task.priority, workspace_id, task.user_id)
            .await?;

        tracing::info!(task_id = id, workspace_id, "Task created");
        Ok(id)
    }

    async fn get_task(&self, id: i32) -> AppResult<Task> {
        self.uow.tasks().get(id).await
    }

    async fn list_tasks(
        &self,
        workspace_id: i32,
        filter: TaskFilter,
        order: SortDirection,
        page: PaginationParams,
    ) -> AppResult<Paginated<Task>> {
        let tasks = self.uow.tasks();
        let data = tasks
            .get_all(workspace_id, page.limit, page.offset(), &filter, order)
            .await?;
        let total = tasks.get_total_tasks(workspace_id, &filter).await?;

        Ok(Paginated::new(data, page, total))
    }

    async fn update_task(&self, id: i32, changes: TaskChanges) -> AppResult<()> {
        let task = self.uow.tasks().get(id).await?;
        self.ensure_assignable(changes.user_id, task.workspace_id)
            .await?;

        self.uow.tasks().update(id, changes).await
    }

    async fn delete_task(&self, id: i32) -> AppResult<()> {
        let rows = self.uow.tasks().delete(id).await?;
        if rows == 0 {
            return Err(AppError::NotFound);
        }

        tracing::info!(task_id = id, "Task deleted");
        Ok(())
    }

    async fn is_member(&self, user_id: i32, task_id: i32) -> AppResult<bool> {
        self.uow.tasks().validate_ownership(user_id, task_id).await
    }

    async fn is_admin(&self, user_id: i32, task_id: i32) -> AppResult<bool> {
        self.uow.tasks().validate_admin(user_id, task_id).await
    }
}
