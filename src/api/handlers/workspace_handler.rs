//! Workspace handlers: CRUD and membership management.

use axum::{
    extract::{Extension, Query, State},
    middleware,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::extractors::{not_blank, IdPath, ValidatedJson};
use crate::api::middleware::{require_workspace_admin, require_workspace_member, CurrentUser};
use crate::api::AppState;
use crate::domain::{UserResponse, Workspace, WorkspaceMember};
use crate::errors::AppResult;
use crate::services::WorkspaceOverview;
use crate::types::{Created, CreatedId, NoContent};

/// Workspace create/update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct WorkspaceRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "This field cannot be more than 100 characters long")
    )]
    #[schema(example = "Platform team")]
    pub title: String,
    #[validate(
        custom(function = "not_blank"),
        length(max = 255, message = "This field cannot be more than 255 characters long")
    )]
    #[schema(example = "Infrastructure and tooling")]
    pub description: String,
}

/// Request to add an existing user to a workspace
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddMemberRequest {
    #[validate(range(min = 1, message = "This field must be a valid user id"))]
    #[schema(example = 2)]
    pub user_id: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InviteQuery {
    /// Email of the user to look up
    #[serde(default)]
    pub email: String,
}

/// A workspace with its members and the caller's rights on it
#[derive(Debug, Serialize, ToSchema)]
pub struct WorkspaceDetail {
    pub workspace: Workspace,
    pub is_admin: bool,
    pub members: Vec<WorkspaceMember>,
}

/// Create workspace routes.
///
/// Callers must already be authenticated; guards here check membership or
/// admin rights on the `:id` workspace.
pub fn workspace_routes(state: &AppState) -> Router<AppState> {
    let member = || middleware::from_fn_with_state(state.clone(), require_workspace_member);
    let admin = || middleware::from_fn_with_state(state.clone(), require_workspace_admin);

    Router::new()
        .route("/", get(list_workspaces).post(create_workspace))
        .route(
            "/:id",
            get(get_workspace)
                .route_layer(member())
                .merge(put(update_workspace).delete(delete_workspace).route_layer(admin())),
        )
        .route(
            "/:id/members",
            get(list_members)
                .route_layer(member())
                .merge(post(add_member).route_layer(admin())),
        )
        .route("/:id/members/invite", get(find_invitee).route_layer(admin()))
        .route("/:id/members/:user_id", delete(remove_member).route_layer(admin()))
}

/// Workspaces the caller owns and those they were invited to
#[utoipa::path(
    get,
    path = "/workspaces",
    tag = "Workspaces",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "Owned and invited workspaces", body = WorkspaceOverview),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn list_workspaces(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<WorkspaceOverview>> {
    let overview = state.workspace_service.list(current_user.id).await?;
    Ok(Json(overview))
}

/// Create a workspace owned by the caller
#[utoipa::path(
    post,
    path = "/workspaces",
    tag = "Workspaces",
    security(("session_cookie" = [])),
    request_body = WorkspaceRequest,
    responses(
        (status = 201, description = "Workspace created", body = CreatedId),
        (status = 401, description = "Not logged in"),
        (status = 409, description = "Workspace limit reached"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_workspace(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<WorkspaceRequest>,
) -> AppResult<Created<CreatedId>> {
    let id = state
        .workspace_service
        .create(current_user.id, payload.title, payload.description)
        .await?;

    Ok(Created(CreatedId { id }))
}

/// Workspace details with members
#[utoipa::path(
    get,
    path = "/workspaces/{id}",
    tag = "Workspaces",
    security(("session_cookie" = [])),
    params(("id" = i32, Path, description = "Workspace ID")),
    responses(
        (status = 200, description = "Workspace details", body = WorkspaceDetail),
        (status = 404, description = "Unknown workspace or not a member")
    )
)]
pub async fn get_workspace(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> AppResult<Json<WorkspaceDetail>> {
    let workspace = state.workspace_service.get(id).await?;
    let members = state.workspace_service.members(id).await?;
    let is_admin = members
        .iter()
        .any(|member| member.id == current_user.id && member.is_admin());

    Ok(Json(WorkspaceDetail {
        workspace,
        is_admin,
        members,
    }))
}

/// Replace a workspace's title and description
#[utoipa::path(
    put,
    path = "/workspaces/{id}",
    tag = "Workspaces",
    security(("session_cookie" = [])),
    params(("id" = i32, Path, description = "Workspace ID")),
    request_body = WorkspaceRequest,
    responses(
        (status = 200, description = "Workspace updated", body = Workspace),
        (status = 404, description = "Unknown workspace or not an admin"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_workspace(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    ValidatedJson(payload): ValidatedJson<WorkspaceRequest>,
) -> AppResult<Json<Workspace>> {
    state
        .workspace_service
        .update(id, payload.title, payload.description)
        .await?;

    let workspace = state.workspace_service.get(id).await?;
    Ok(Json(workspace))
}

/// Delete a workspace and all of its tasks
#[utoipa::path(
    delete,
    path = "/workspaces/{id}",
    tag = "Workspaces",
    security(("session_cookie" = [])),
    params(("id" = i32, Path, description = "Workspace ID")),
    responses(
        (status = 204, description = "Workspace deleted"),
        (status = 404, description = "Unknown workspace or not an admin")
    )
)]
pub async fn delete_workspace(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> AppResult<NoContent> {
    state.workspace_service.delete(id).await?;
    Ok(NoContent)
}

/// Members of a workspace with their roles
#[utoipa::path(
    get,
    path = "/workspaces/{id}/members",
    tag = "Workspaces",
    security(("session_cookie" = [])),
    params(("id" = i32, Path, description = "Workspace ID")),
    responses(
        (status = 200, description = "Workspace members", body = Vec<WorkspaceMember>),
        (status = 404, description = "Unknown workspace or not a member")
    )
)]
pub async fn list_members(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> AppResult<Json<Vec<WorkspaceMember>>> {
    let members = state.workspace_service.members(id).await?;
    Ok(Json(members))
}

/// Look up a user by email who could be added to the workspace
#[utoipa::path(
    get,
    path = "/workspaces/{id}/members/invite",
    tag = "Workspaces",
    security(("session_cookie" = [])),
    params(("id" = i32, Path, description = "Workspace ID"), InviteQuery),
    responses(
        (status = 200, description = "User that can be invited", body = UserResponse),
        (status = 404, description = "No such user outside the workspace"),
        (status = 409, description = "User has reached the membership limit")
    )
)]
pub async fn find_invitee(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    Query(query): Query<InviteQuery>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .workspace_service
        .find_invitee(id, query.email.trim())
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// Add a user to the workspace as MEMBER
#[utoipa::path(
    post,
    path = "/workspaces/{id}/members",
    tag = "Workspaces",
    security(("session_cookie" = [])),
    params(("id" = i32, Path, description = "Workspace ID")),
    request_body = AddMemberRequest,
    responses(
        (status = 204, description = "Member added"),
        (status = 400, description = "Cannot add yourself"),
        (status = 404, description = "Unknown workspace or not an admin"),
        (status = 409, description = "Already a member or membership limit reached"),
        (status = 422, description = "Unknown user")
    )
)]
pub async fn add_member(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    ValidatedJson(payload): ValidatedJson<AddMemberRequest>,
) -> AppResult<NoContent> {
    state
        .workspace_service
        .add_member(id, current_user.id, payload.user_id)
        .await?;

    Ok(NoContent)
}

/// Remove a member from the workspace
#[utoipa::path(
    delete,
    path = "/workspaces/{id}/members/{user_id}",
    tag = "Workspaces",
    security(("session_cookie" = [])),
    params(
        ("id" = i32, Path, description = "Workspace ID"),
        ("user_id" = i32, Path, description = "Member to remove")
    ),
    responses(
        (status = 204, description = "Member removed"),
        (status = 404, description = "Not a member, or caller is not an admin")
    )
)]
pub async fn remove_member(
    State(state): State<AppState>,
    IdPath((id, user_id)): IdPath<(i32, i32)>,
) -> AppResult<NoContent> {
    state.workspace_service.remove_member(id, user_id).await?;
    Ok(NoContent)
}
