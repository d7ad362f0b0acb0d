//! Cookie-addressed server-side sessions.
//!
//! The middleware loads the session named by the cookie (or starts an
//! anonymous one), exposes it to handlers as a `Session` extension, and
//! persists it after the handler ran if anything changed.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::{Arc, Mutex, MutexGuard};
use subtle::ConstantTimeEq;

use crate::api::AppState;
use crate::config::SESSION_COOKIE_NAME;
use crate::errors::AppError;
use crate::infra::{generate_token, SessionData};

/// Request-scoped handle on the current session.
///
/// Clones share state, so changes made by a handler are seen by the
/// middleware that commits them.
#[derive(Clone, Debug)]
pub struct Session {
    inner: Arc<Mutex<SessionState>>,
}

#[derive(Debug)]
struct SessionState {
    token: String,
    data: SessionData,
    /// Needs saving (and a cookie) at the end of the request
    dirty: bool,
    /// Record to destroy because the token was renewed
    stale_token: Option<String>,
    /// Not yet persisted anywhere
    is_new: bool,
}

/// What the middleware must write back after the handler
#[derive(Debug, PartialEq, Eq)]
pub struct SessionCommit {
    pub token: String,
    pub data: SessionData,
    pub stale_token: Option<String>,
}

impl Session {
    /// Anonymous session that exists only in memory until it is modified
    pub fn fresh() -> Self {
        Self::with_state(SessionState {
            token: generate_token(),
            data: SessionData::new(),
            dirty: false,
            stale_token: None,
            is_new: true,
        })
    }

    /// Session loaded from the store under `token`
    pub fn existing(token: String, data: SessionData) -> Self {
        Self::with_state(SessionState {
            token,
            data,
            dirty: false,
            stale_token: None,
            is_new: false,
        })
    }

    fn with_state(state: SessionState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        // A panic while holding the lock cannot leave the state half-written.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn user_id(&self) -> Option<i32> {
        self.state().data.user_id
    }

    /// CSRF token of this session. Reading it from a fresh session persists
    /// the session so the token can be checked on the next request.
    pub fn csrf_token(&self) -> String {
        let mut state = self.state();
        if state.is_new {
            state.dirty = true;
        }
        state.data.csrf_token.clone()
    }

    /// Constant-time comparison against the session's CSRF token
    pub fn csrf_matches(&self, candidate: &str) -> bool {
        let state = self.state();
        state.data.csrf_token.as_bytes().ct_eq(candidate.as_bytes()).into()
    }

    /// Bind the session to `user_id` under a new token.
    pub fn login(&self, user_id: i32) {
        self.renew(Some(user_id));
    }

    /// Drop the authenticated user, again under a new token.
    pub fn logout(&self) {
        self.renew(None);
    }

    fn renew(&self, user_id: Option<i32>) {
        let mut state = self.state();
        let new_token = generate_token();
        let old_token = std::mem::replace(&mut state.token, new_token);

        if !state.is_new && state.stale_token.is_none() {
            state.stale_token = Some(old_token);
        }
        state.data.user_id = user_id;
        state.data.csrf_token = generate_token();
        state.dirty = true;
    }

    /// Pending write, if the session changed. Clears the dirty flag.
    pub fn take_commit(&self) -> Option<SessionCommit> {
        let mut state = self.state();
        if !state.dirty {
            return None;
        }

        state.dirty = false;
        state.is_new = false;
        Some(SessionCommit {
            token: state.token.clone(),
            data: state.data.clone(),
            stale_token: state.stale_token.take(),
        })
    }
}

/// Load the session, run the handler, then persist changes and set the cookie.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = match jar.get(SESSION_COOKIE_NAME) {
        Some(cookie) => match state.sessions.load(cookie.value()).await? {
            Some(data) => Session::existing(cookie.value().to_string(), data),
            None => Session::fresh(),
        },
        None => Session::fresh(),
    };

    request.extensions_mut().insert(session.clone());
    let response = next.run(request).await;

    let Some(commit) = session.take_commit() else {
        return Ok(response);
    };

    if let Some(stale) = &commit.stale_token {
        state.sessions.destroy(stale).await?;
    }
    state
        .sessions
        .save(&commit.token, &commit.data, state.config.session_ttl_seconds)
        .await?;

    let cookie = Cookie::build((SESSION_COOKIE_NAME, commit.token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.cookie_secure);

    Ok((jar.add(cookie), response).into_response())
}
