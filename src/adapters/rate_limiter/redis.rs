//! Redis-backed rate limiter for multi-node deployments.
//!
//! Fixed window with `INCR` + `EXPIRE`: the first request in a window sets
//! the expiry, requests past the limit are denied until the key expires.
//! Requests can briefly exceed the limit across a window boundary.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::Timestamp;
use crate::ports::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter,
};

use super::config::RateLimitConfig;

#[derive(Clone)]
pub struct RedisRateLimiter {
    conn: MultiplexedConnection,
    config: RateLimitConfig,
}

impl RedisRateLimiter {
    pub fn new(conn: MultiplexedConnection, config: RateLimitConfig) -> Self {
        Self { conn, config }
    }

    /// Seconds until the key's window closes.
    async fn seconds_left(
        conn: &mut MultiplexedConnection,
        key: &str,
        window_secs: u32,
    ) -> Result<u64, RateLimitError> {
        let ttl: i64 = conn.ttl(key).await.map_err(unavailable)?;
        Ok(if ttl > 0 { ttl as u64 } else { window_secs as u64 })
    }
}

fn unavailable(err: redis::RedisError) -> RateLimitError {
    RateLimitError::Unavailable(err.to_string())
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        let redis_key = key.to_redis_key();
        let (limit, window_secs) = self.config.limits_for(key.scope);
        let mut conn = self.conn.clone();

        let count: u64 = conn.incr(&redis_key, 1_u64).await.map_err(unavailable)?;
        if count == 1 {
            conn.expire::<_, ()>(&redis_key, window_secs as i64)
                .await
                .map_err(unavailable)?;
        }

        let reset_secs = Self::seconds_left(&mut conn, &redis_key, window_secs).await?;

        if count > limit as u64 {
            let retry_after = (reset_secs as u32).max(1);
            return Ok(RateLimitResult::Denied(RateLimitDenied {
                limit,
                retry_after_secs: retry_after,
                scope: key.scope,
                message: format!(
                    "Too many requests for this {}. Retry after {} seconds.",
                    key.scope, retry_after
                ),
            }));
        }

        Ok(RateLimitResult::Allowed(RateLimitStatus {
            limit,
            remaining: limit.saturating_sub(count as u32),
            reset_at: Timestamp::from_unix_secs(Timestamp::now().as_unix_secs() + reset_secs),
            window_secs,
        }))
    }

    async fn status(&self, key: RateLimitKey) -> Result<RateLimitStatus, RateLimitError> {
        let redis_key = key.to_redis_key();
        let (limit, window_secs) = self.config.limits_for(key.scope);
        let mut conn = self.conn.clone();

        let count: Option<u64> = conn.get(&redis_key).await.map_err(unavailable)?;
        let reset_secs = Self::seconds_left(&mut conn, &redis_key, window_secs).await?;

        Ok(RateLimitStatus {
            limit,
            remaining: limit.saturating_sub(count.unwrap_or(0) as u32),
            reset_at: Timestamp::from_unix_secs(Timestamp::now().as_unix_secs() + reset_secs),
            window_secs,
        })
    }

    async fn reset(&self, key: RateLimitKey) -> Result<(), RateLimitError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key.to_redis_key())
            .await
            .map_err(unavailable)
    }
}

impl std::fmt::Debug for RedisRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisRateLimiter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
