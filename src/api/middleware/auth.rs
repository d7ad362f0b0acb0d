//! Session authentication middleware.

use axum::{
    extract::{Extension, Request, State},
    http::{header::CACHE_CONTROL, HeaderValue},
    middleware::Next,
    response::Response,
};

use super::Session;
use crate::api::AppState;
use crate::errors::AppError;

/// Authenticated user taken from the session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
}

/// Session authentication middleware.
///
/// Requires a logged-in session whose user still exists, injects the
/// `CurrentUser` into the request extensions, and keeps the response out of
/// shared caches.
pub async fn auth_middleware(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = session.user_id().ok_or(AppError::Unauthorized)?;

    if !state.auth_service.user_exists(user_id).await? {
        return Err(AppError::Unauthorized);
    }

    request.extensions_mut().insert(CurrentUser { id: user_id });

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));

    Ok(response)
}
