//! Task repository: CRUD, filtered listing, and access checks that go
//! through the task's workspace membership.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::entities::membership;
use super::entities::task::{self, ActiveModel, Entity as TaskEntity};
use crate::config::STATUS_TODO;
use crate::domain::{finished_for_status, SortDirection, Task, TaskChanges, TaskFilter, WorkspaceRole};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Task repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Create a task in the "To Do" status, returning its id.
    async fn insert(
        &self,
        title: String,
        content: String,
        priority: String,
        workspace_id: i32,
        user_id: i32,
    ) -> AppResult<i32>;

    async fn get(&self, id: i32) -> AppResult<Task>;

    /// One page of a workspace's tasks matching `filter`, ordered by creation time
    async fn get_all(
        &self,
        workspace_id: i32,
        limit: u64,
        offset: u64,
        filter: &TaskFilter,
        order: SortDirection,
    ) -> AppResult<Vec<Task>>;

    /// Number of tasks `get_all` would return across all pages
    async fn get_total_tasks(&self, workspace_id: i32, filter: &TaskFilter) -> AppResult<u64>;

    /// Replace the editable fields. `finished` follows the new status.
    async fn update(&self, id: i32, changes: TaskChanges) -> AppResult<()>;

    async fn delete(&self, id: i32) -> AppResult<u64>;

    /// Whether `user_id` belongs to the workspace that holds the task
    async fn validate_ownership(&self, user_id: i32, task_id: i32) -> AppResult<bool>;

    /// Whether `user_id` administers the workspace that holds the task
    async fn validate_admin(&self, user_id: i32, task_id: i32) -> AppResult<bool>;
}

/// Concrete implementation of TaskRepository
pub struct TaskStore {
    db: DatabaseConnection,
}

impl TaskStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn reachable_through(
        &self,
        user_id: i32,
        task_id: i32,
        role: Option<WorkspaceRole>,
    ) -> AppResult<bool> {
        let count = TaskEntity::find_by_id(task_id)
            .filter(task::Column::WorkspaceId.in_subquery(membership::workspace_ids_of(user_id, role)))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}

/// WHERE clause shared by the page query and its count
fn listing_condition(workspace_id: i32, filter: &TaskFilter) -> Condition {
    Condition::all()
        .add(task::Column::WorkspaceId.eq(workspace_id))
        .add_option(filter.title.as_deref().map(title_contains))
        .add_option(filter.priority.as_deref().map(|p| task::Column::Priority.eq(p)))
        .add_option(filter.status.as_deref().map(|s| task::Column::Status.eq(s)))
}

/// Case-insensitive substring match on the title, on every backend
fn title_contains(needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col((TaskEntity, task::Column::Title))))
        .like(format!("%{}%", needle.to_lowercase()))
}

impl From<SortDirection> for Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }
}

#[async_trait]
impl TaskRepository for TaskStore {
    async fn insert(
        &self,
        title: String,
        content: String,
        priority: String,
        workspace_id: i32,
        user_id: i32,
    ) -> AppResult<i32> {
        let active_model = ActiveModel {
            title: Set(title),
            content: Set(content),
            priority: Set(priority),
            status: Set(STATUS_TODO.to_string()),
            created: Set(chrono::Utc::now()),
            finished: Set(None),
            workspace_id: Set(workspace_id),
            user_id: Set(user_id),
            ..Default::default()
        };

        let result = TaskEntity::insert(active_model).exec(&self.db).await?;
        Ok(result.last_insert_id)
    }

    async fn get(&self, id: i32) -> AppResult<Task> {
        let model = TaskEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?;

        Ok(Task::from(model))
    }

    async fn get_all(
        &self,
        workspace_id: i32,
        limit: u64,
        offset: u64,
        filter: &TaskFilter,
        order: SortDirection,
    ) -> AppResult<Vec<Task>> {
        let models = TaskEntity::find()
            .filter(listing_condition(workspace_id, filter))
            .order_by(task::Column::Created, order.into())
            .order_by(task::Column::Id, order.into())
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Task::from).collect())
    }

    async fn get_total_tasks(&self, workspace_id: i32, filter: &TaskFilter) -> AppResult<u64> {
        let count = TaskEntity::find()
            .filter(listing_condition(workspace_id, filter))
            .count(&self.db)
            .await?;

        Ok(count)
    }

    async fn update(&self, id: i32, changes: TaskChanges) -> AppResult<()> {
        let finished = finished_for_status(&changes.status, chrono::Utc::now());

        let result = TaskEntity::update_many()
            .col_expr(task::Column::Title, Expr::value(changes.title))
            .col_expr(task::Column::Content, Expr::value(changes.content))
            .col_expr(task::Column::Priority, Expr::value(changes.priority))
            .col_expr(task::Column::UserId, Expr::value(changes.user_id))
            .col_expr(task::Column::Status, Expr::value(changes.status))
            .col_expr(task::Column::Finished, Expr::value(finished))
            .filter(task::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: i32) -> AppResult<u64> {
        let result = TaskEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }

    async fn validate_ownership(&self, user_id: i32, task_id: i32) -> AppResult<bool> {
        self.reachable_through(user_id, task_id, None).await
    }

    async fn validate_admin(&self, user_id: i32, task_id: i32) -> AppResult<bool> {
        self.reachable_through(user_id, task_id, Some(WorkspaceRole::Admin))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_listing_without_filters_only_scopes_workspace() {
        let sql = TaskEntity::find()
            .filter(listing_condition(7, &TaskFilter::none()))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""tasks"."workspace_id" = 7"#));
        assert!(!sql.contains("LIKE"));
        assert!(!sql.contains(r#""tasks"."status" ="#));
    }

    #[test]
    fn test_title_filter_is_case_insensitive_substring() {
        let filter = TaskFilter::new("Al", "", "");
        let sql = TaskEntity::find()
            .filter(listing_condition(1, &filter))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"LOWER("tasks"."title") LIKE '%al%'"#), "{sql}");
    }

    #[test]
    fn test_title_filter_keeps_surrounding_whitespace() {
        let filter = TaskFilter::new(" Al", "", "");
        let sql = TaskEntity::find()
            .filter(listing_condition(1, &filter))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains("'% al%'"), "{sql}");
    }

    #[test]
    fn test_sort_direction_maps_to_order() {
        assert!(matches!(Order::from(SortDirection::Asc), Order::Asc));
        assert!(matches!(Order::from(SortDirection::Desc), Order::Desc));
    }
}
