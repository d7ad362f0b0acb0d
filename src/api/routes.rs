//! Application route configuration.

use axum::{
    http::{header, HeaderName, HeaderValue},
    middleware, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    auth_routes, health_routes, task_routes, workspace_routes, workspace_task_routes,
};
use super::middleware::{auth_middleware, csrf_middleware, session_middleware};
use super::openapi::ApiDoc;
use super::AppState;
use crate::config::{CONTENT_SECURITY_POLICY, REFERRER_POLICY};

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let authenticated = || middleware::from_fn_with_state(state.clone(), auth_middleware);

    Router::new()
        .merge(health_routes())
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/auth", auth_routes(&state))
        // Guards on individual routes run after the session user is resolved
        .nest(
            "/workspaces",
            workspace_routes(&state)
                .merge(workspace_task_routes(&state))
                .route_layer(authenticated()),
        )
        .nest("/tasks", task_routes(&state).route_layer(authenticated()))
        // Session must wrap CSRF: the check reads the loaded session
        .layer(middleware::from_fn(csrf_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(security_header(
            header::CONTENT_SECURITY_POLICY,
            CONTENT_SECURITY_POLICY,
        ))
        .layer(security_header(header::REFERRER_POLICY, REFERRER_POLICY))
        .layer(security_header(header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .layer(security_header(header::X_FRAME_OPTIONS, "deny"))
        .layer(security_header(header::X_XSS_PROTECTION, "0"))
        .with_state(state)
}

fn security_header(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}
