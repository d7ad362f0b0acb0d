//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, health_handler, task_handler, workspace_handler};
use crate::config::SESSION_COOKIE_NAME;
use crate::domain::{Task, UserResponse, Workspace, WorkspaceMember, WorkspaceRole};
use crate::services::WorkspaceOverview;
use crate::types::{CreatedId, MessageResponse, PaginatedTasks, PaginationMeta};

/// OpenAPI documentation for the Task Manager API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Task Manager API",
        version = "0.1.0",
        description = "Shared workspaces with role-based membership and tasks",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:4000", description = "Local development server")
    ),
    paths(
        health_handler::ping,
        health_handler::health_check,
        // Authentication endpoints
        auth_handler::csrf_token,
        auth_handler::register,
        auth_handler::login,
        auth_handler::logout,
        // Workspace endpoints
        workspace_handler::list_workspaces,
        workspace_handler::create_workspace,
        workspace_handler::get_workspace,
        workspace_handler::update_workspace,
        workspace_handler::delete_workspace,
        workspace_handler::list_members,
        workspace_handler::find_invitee,
        workspace_handler::add_member,
        workspace_handler::remove_member,
        // Task endpoints
        task_handler::list_tasks,
        task_handler::create_task,
        task_handler::get_task,
        task_handler::update_task,
        task_handler::delete_task,
    ),
    components(
        schemas(
            // Domain types
            Task,
            Workspace,
            WorkspaceMember,
            WorkspaceRole,
            UserResponse,
            WorkspaceOverview,
            // Shared response types
            CreatedId,
            MessageResponse,
            PaginatedTasks,
            PaginationMeta,
            health_handler::HealthResponse,
            health_handler::ServiceStatus,
            health_handler::ServiceHealth,
            // Request/response bodies
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::CsrfResponse,
            auth_handler::LoginResponse,
            workspace_handler::WorkspaceRequest,
            workspace_handler::AddMemberRequest,
            workspace_handler::WorkspaceDetail,
            task_handler::CreateTaskRequest,
            task_handler::UpdateTaskRequest,
            task_handler::TaskDetail,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and dependency checks"),
        (name = "Authentication", description = "Registration, login and sessions"),
        (name = "Workspaces", description = "Workspaces and their members"),
        (name = "Tasks", description = "Tasks inside a workspace")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for the session cookie
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    SESSION_COOKIE_NAME,
                    "Session cookie set by /auth/login",
                ))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/ping",
            "/auth/login",
            "/workspaces",
            "/workspaces/{id}",
            "/workspaces/{id}/tasks",
            "/workspaces/{id}/members/{user_id}",
            "/tasks/{id}",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn test_session_cookie_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("session_cookie"));
    }
}
