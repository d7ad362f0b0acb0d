//! Server-side session storage.
//!
//! A session is addressed by an opaque random token carried in a cookie.
//! The record itself (who is logged in, the CSRF token) never leaves the
//! server.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cache::Cache;
use crate::errors::AppResult;

/// Persisted session record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    /// Authenticated user, if any
    pub user_id: Option<i32>,
    pub csrf_token: String,
}

impl SessionData {
    /// Anonymous session with a fresh CSRF token
    pub fn new() -> Self {
        Self {
            user_id: None,
            csrf_token: generate_token(),
        }
    }
}

impl Default for SessionData {
    fn default() -> Self {
        Self::new()
    }
}

/// Two random v4 UUIDs, hex encoded without separators.
pub fn generate_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// Session store trait for dependency injection.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, token: &str) -> AppResult<Option<SessionData>>;

    async fn save(&self, token: &str, data: &SessionData, ttl_seconds: u64) -> AppResult<()>;

    async fn destroy(&self, token: &str) -> AppResult<()>;

    /// Connectivity check for health reporting
    async fn ping(&self) -> AppResult<()>;
}

/// Redis-backed session store
#[derive(Clone)]
pub struct RedisSessionStore {
    cache: Cache,
}

impl RedisSessionStore {
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, token: &str) -> AppResult<Option<SessionData>> {
        self.cache.get_session(token).await
    }

    async fn save(&self, token: &str, data: &SessionData, ttl_seconds: u64) -> AppResult<()> {
        self.cache.set_session(token, data, ttl_seconds).await
    }

    async fn destroy(&self, token: &str) -> AppResult<()> {
        self.cache.delete_session(token).await
    }

    async fn ping(&self) -> AppResult<()> {
        self.cache.ping().await
    }
}
