//! CSRF protection for state-changing requests.

use axum::{
    extract::{Extension, Request},
    http::Method,
    middleware::Next,
    response::Response,
};

use super::Session;
use crate::config::CSRF_HEADER_NAME;
use crate::errors::AppError;

/// Reject unsafe methods whose `X-CSRF-Token` header does not match the
/// session's token.
pub async fn csrf_middleware(
    Extension(session): Extension<Session>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !is_safe(request.method()) {
        let provided = request
            .headers()
            .get(CSRF_HEADER_NAME)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if !session.csrf_matches(provided) {
            tracing::warn!(method = %request.method(), path = %request.uri().path(), "CSRF check failed");
            return Err(AppError::CsrfMismatch);
        }
    }

    Ok(next.run(request).await)
}

fn is_safe(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}
