//! Redis cache implementation.
//!
//! Thin JSON-over-redis wrapper with connection pooling, used as the
//! backing store for server-side sessions.

use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::{Config, CACHE_PREFIX_SESSION};
use crate::errors::{AppError, AppResult};

/// Redis cache wrapper with connection pooling.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Connect to Redis, returning an error instead of panicking.
    pub async fn connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis cache connected");

        Ok(Self { connection })
    }

    /// Get a value from cache.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;

        match value {
            Some(json) => {
                let parsed = serde_json::from_str(&json).map_err(|e| {
                    AppError::internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Set a value in cache with a TTL in seconds.
    pub async fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::internal(format!("Cache serialization error: {}", e)))?;

        conn.set_ex::<_, _, ()>(key, json, ttl_seconds).await?;

        Ok(())
    }

    /// Delete a value from cache.
    pub async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }

    /// Round-trip a PING to check connectivity.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    // =========================================================================
    // Session Operations
    // =========================================================================

    /// Store session data.
    pub async fn set_session<T: Serialize>(
        &self,
        token: &str,
        data: &T,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        self.set_with_ttl(&session_key(token), data, ttl_seconds).await
    }

    /// Get session data.
    pub async fn get_session<T: DeserializeOwned>(&self, token: &str) -> AppResult<Option<T>> {
        self.get(&session_key(token)).await
    }

    /// Delete session.
    pub async fn delete_session(&self, token: &str) -> AppResult<()> {
        self.delete(&session_key(token)).await
    }
}

fn session_key(token: &str) -> String {
    format!("{}{}", CACHE_PREFIX_SESSION, token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_keys_are_prefixed() {
        assert_eq!(session_key("abc"), "session:abc");
    }
}
