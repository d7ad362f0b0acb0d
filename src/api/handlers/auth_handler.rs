//! Authentication handlers: sign up, log in and out, CSRF token.

use axum::{
    extract::{Extension, State},
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{not_blank, ValidatedJson};
use crate::api::middleware::{auth_middleware, Session};
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::{Created, CreatedId, MessageResponse};

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 20, message = "This field cannot be more than 20 characters long")
    )]
    #[schema(example = "Alice")]
    pub first_name: String,
    #[validate(
        custom(function = "not_blank"),
        length(max = 20, message = "This field cannot be more than 20 characters long")
    )]
    #[schema(example = "Smith")]
    pub last_name: String,
    #[validate(email(message = "This field must be a valid email address"))]
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "This field must be at least 6 characters long"))]
    #[schema(example = "secret123", min_length = 6)]
    pub password: String,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "This field must be a valid email address"))]
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "secret123")]
    pub password: String,
}

/// CSRF token to echo back in the `X-CSRF-Token` header
#[derive(Debug, Serialize, ToSchema)]
pub struct CsrfResponse {
    pub csrf_token: String,
}

/// Result of a successful login
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = 1)]
    pub user_id: i32,
    /// The session was renewed, so the previous CSRF token is void
    pub csrf_token: String,
}

/// Create authentication routes
pub fn auth_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/csrf", get(csrf_token))
        .route("/register", post(register))
        .route("/login", post(login))
        .route(
            "/logout",
            post(logout).route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
}

/// Fetch the session's CSRF token
#[utoipa::path(
    get,
    path = "/auth/csrf",
    tag = "Authentication",
    responses((status = 200, description = "Token for state-changing requests", body = CsrfResponse))
)]
pub async fn csrf_token(Extension(session): Extension<Session>) -> Json<CsrfResponse> {
    Json(CsrfResponse {
        csrf_token: session.csrf_token(),
    })
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = CreatedId),
        (status = 400, description = "Malformed body or CSRF failure"),
        (status = 409, description = "Email address is already in use"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<CreatedId>> {
    let id = state
        .auth_service
        .register(
            payload.first_name,
            payload.last_name,
            payload.email,
            payload.password,
        )
        .await?;

    Ok(Created(CreatedId { id }))
}

/// Log in, renewing the session
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Email or password is incorrect"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user_id = state
        .auth_service
        .authenticate(&payload.email, &payload.password)
        .await?;

    session.login(user_id);
    tracing::info!(user_id, "User logged in");

    Ok(Json(LoginResponse {
        user_id,
        csrf_token: session.csrf_token(),
    }))
}

/// Log out, renewing the session
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Authentication",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn logout(Extension(session): Extension<Session>) -> Json<MessageResponse> {
    session.logout();
    Json(MessageResponse::new("You've been logged out successfully"))
}
