//! Task handlers: listing inside a workspace and per-task CRUD.

use axum::{
    extract::{Extension, Query, State},
    middleware,
    response::Json,
    routing::{delete, get},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::api::extractors::{not_blank, IdPath, ValidatedJson};
use crate::api::middleware::{
    require_task_admin, require_task_member, require_workspace_member, CurrentUser,
};
use crate::api::AppState;
use crate::config::VALID_PRIORITIES;
use crate::domain::{SortDirection, Task, TaskChanges, TaskFilter, UserResponse};
use crate::errors::AppResult;
use crate::services::NewTask;
use crate::types::{Created, CreatedId, NoContent, Paginated, PaginationParams};

fn valid_priority(value: &str) -> Result<(), ValidationError> {
    if VALID_PRIORITIES.contains(&value) {
        Ok(())
    } else {
        let mut error = ValidationError::new("priority");
        error.message = Some("This field must be one of LOW, MEDIUM or HIGH".into());
        Err(error)
    }
}

/// Task creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTaskRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "This field cannot be more than 100 characters long")
    )]
    #[schema(example = "Rotate TLS certificates")]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Staging and production both expire next week")]
    pub content: String,
    #[validate(custom(function = "valid_priority"))]
    #[schema(example = "HIGH")]
    pub priority: String,
    /// Assignee; defaults to the caller
    #[validate(range(min = 1, message = "This field must be a valid user id"))]
    pub user_id: Option<i32>,
}

/// Full replacement of a task's editable fields
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTaskRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "This field cannot be more than 100 characters long")
    )]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub content: String,
    #[validate(custom(function = "valid_priority"))]
    #[schema(example = "MEDIUM")]
    pub priority: String,
    #[validate(range(min = 1, message = "This field must be a valid user id"))]
    pub user_id: i32,
    /// "Completed" stamps the finish time; any other status clears it
    #[validate(
        custom(function = "not_blank"),
        length(max = 20, message = "This field cannot be more than 20 characters long")
    )]
    #[schema(example = "Completed")]
    pub status: String,
}

impl From<UpdateTaskRequest> for TaskChanges {
    fn from(request: UpdateTaskRequest) -> Self {
        Self {
            title: request.title,
            content: request.content,
            priority: request.priority,
            user_id: request.user_id,
            status: request.status,
        }
    }
}

/// Filters, order and page of a task listing. Every field is optional and
/// unparsable values fall back to defaults.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TaskListQuery {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Exact priority
    pub priority: Option<String>,
    /// Exact status
    pub status: Option<String>,
    /// "desc" for newest first, anything else for oldest first
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl TaskListQuery {
    fn filter(&self) -> TaskFilter {
        TaskFilter::new(
            self.title.as_deref().unwrap_or_default(),
            self.priority.as_deref().unwrap_or_default(),
            self.status.as_deref().unwrap_or_default(),
        )
    }

    fn direction(&self) -> SortDirection {
        SortDirection::parse(self.sort.as_deref().unwrap_or_default())
    }

    fn pagination(&self) -> PaginationParams {
        PaginationParams::from_query(self.page.as_deref(), self.limit.as_deref())
    }
}

/// A task with its assignee and the caller's rights on it
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskDetail {
    pub task: Task,
    pub assignee: UserResponse,
    /// Caller is an admin of the task's workspace
    pub can_delete: bool,
}

/// Task routes mounted under `/workspaces`
pub fn workspace_task_routes(state: &AppState) -> Router<AppState> {
    Router::new().route(
        "/:id/tasks",
        get(list_tasks)
            .post(create_task)
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_workspace_member,
            )),
    )
}

/// Task routes mounted under `/tasks`
pub fn task_routes(state: &AppState) -> Router<AppState> {
    let member = middleware::from_fn_with_state(state.clone(), require_task_member);
    let admin = middleware::from_fn_with_state(state.clone(), require_task_admin);

    Router::new().route(
        "/:id",
        get(get_task)
            .put(update_task)
            .route_layer(member)
            .merge(delete(delete_task).route_layer(admin)),
    )
}

/// List a workspace's tasks
#[utoipa::path(
    get,
    path = "/workspaces/{id}/tasks",
    tag = "Tasks",
    security(("session_cookie" = [])),
    params(("id" = i32, Path, description = "Workspace ID"), TaskListQuery),
    responses(
        (status = 200, description = "One page of tasks", body = crate::types::PaginatedTasks),
        (status = 404, description = "Unknown workspace or not a member")
    )
)]
pub async fn list_tasks(
    State(state): State<AppState>,
    IdPath(workspace_id): IdPath<i32>,
    Query(query): Query<TaskListQuery>,
) -> AppResult<Json<Paginated<Task>>> {
    let page = state
        .task_service
        .list_tasks(
            workspace_id,
            query.filter(),
            query.direction(),
            query.pagination(),
        )
        .await?;

    Ok(Json(page))
}

/// Create a task in the workspace
#[utoipa::path(
    post,
    path = "/workspaces/{id}/tasks",
    tag = "Tasks",
    security(("session_cookie" = [])),
    params(("id" = i32, Path, description = "Workspace ID")),
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = CreatedId),
        (status = 404, description = "Unknown workspace or not a member"),
        (status = 422, description = "Validation error or assignee outside the workspace")
    )
)]
pub async fn create_task(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    IdPath(workspace_id): IdPath<i32>,
    ValidatedJson(payload): ValidatedJson<CreateTaskRequest>,
) -> AppResult<Created<CreatedId>> {
    let task = NewTask {
        title: payload.title,
        content: payload.content,
        priority: payload.priority,
        user_id: payload.user_id.unwrap_or(current_user.id),
    };

    let id = state.task_service.create_task(workspace_id, task).await?;
    Ok(Created(CreatedId { id }))
}

/// Task details
#[utoipa::path(
    get,
    path = "/tasks/{id}",
    tag = "Tasks",
    security(("session_cookie" = [])),
    params(("id" = i32, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task with its assignee", body = TaskDetail),
        (status = 404, description = "Unknown task or not a member of its workspace")
    )
)]
pub async fn get_task(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> AppResult<Json<TaskDetail>> {
    let task = state.task_service.get_task(id).await?;
    let assignee = state.auth_service.get_user(task.user_id).await?;
    let can_delete = state.task_service.is_admin(current_user.id, id).await?;

    Ok(Json(TaskDetail {
        task,
        assignee: UserResponse::from(assignee),
        can_delete,
    }))
}

/// Replace a task's fields
#[utoipa::path(
    put,
    path = "/tasks/{id}",
    tag = "Tasks",
    security(("session_cookie" = [])),
    params(("id" = i32, Path, description = "Task ID")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 404, description = "Unknown task or not a member of its workspace"),
        (status = 422, description = "Validation error or assignee outside the workspace")
    )
)]
pub async fn update_task(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateTaskRequest>,
) -> AppResult<Json<Task>> {
    state.task_service.update_task(id, payload.into()).await?;

    let task = state.task_service.get_task(id).await?;
    Ok(Json(task))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    tag = "Tasks",
    security(("session_cookie" = [])),
    params(("id" = i32, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 404, description = "Unknown task or not an admin of its workspace")
    )
)]
pub async fn delete_task(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> AppResult<NoContent> {
    state.task_service.delete_task(id).await?;
    Ok(NoContent)
}
