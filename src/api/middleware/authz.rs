//! Resource guards: membership or admin rights on the workspace named by
//! the `:id` path segment, directly or through a task.
//!
//! A failed check answers 404 so callers cannot discover ids they have no
//! access to.

use axum::{
    extract::{Extension, Path, Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;

use super::CurrentUser;
use crate::api::AppState;
use crate::errors::{AppError, AppResult};

/// Positive integer under `:id`, else NotFound
fn resource_id(params: &HashMap<String, String>) -> AppResult<i32> {
    params
        .get("id")
        .and_then(|raw| raw.parse::<i32>().ok())
        .filter(|id| *id >= 1)
        .ok_or(AppError::NotFound)
}

fn ensure(allowed: bool) -> AppResult<()> {
    if allowed {
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}

pub async fn require_workspace_member(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let workspace_id = resource_id(&params)?;
    ensure(state.workspace_service.is_member(user.id, workspace_id).await?)?;
    Ok(next.run(request).await)
}

pub async fn require_workspace_admin(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let workspace_id = resource_id(&params)?;
    ensure(state.workspace_service.is_admin(user.id, workspace_id).await?)?;
    Ok(next.run(request).await)
}

pub async fn require_task_member(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let task_id = resource_id(&params)?;
    ensure(state.task_service.is_member(user.id, task_id).await?)?;
    Ok(next.run(request).await)
}

pub async fn require_task_admin(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let task_id = resource_id(&params)?;
    ensure(state.task_service.is_admin(user.id, task_id).await?)?;
    Ok(next.run(request).await)
}
