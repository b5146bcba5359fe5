//! In-memory rate limiter for tests and single-node development.
//!
//! Fixed-window counters in a HashMap. Counters are per process, so this is
//! not suitable when several API nodes serve the same widget traffic.
//! Expired windows are dropped on every check, so the map only holds keys
//! seen within the last window.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::Timestamp;
use crate::ports::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter,
};

use super::config::RateLimitConfig;

#[derive(Debug, Default)]
pub struct InMemoryRateLimiter {
    config: RateLimitConfig,
    windows: Arc<RwLock<HashMap<String, WindowState>>>,
}

#[derive(Debug, Clone, Copy)]
struct WindowState {
    count: u32,
    window_start: u64,
}

impl WindowState {
    fn expired(&self, now: u64, window_secs: u32) -> bool {
        now >= self.window_start + window_secs as u64
    }
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn now_secs() -> u64 {
        Timestamp::now().as_unix_secs()
    }

    #[cfg(test)]
    async fn tracked_keys(&self) -> usize {
        self.windows.read().await.len()
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        let (limit, window_secs) = self.config.limits_for(key.scope);
        let now = Self::now_secs();

        let mut windows = self.windows.write().await;
        windows.retain(|_, s| !s.expired(now, window_secs));
        let state = windows.entry(key.to_redis_key()).or_insert(WindowState {
            count: 0,
            window_start: now,
        });

        if state.expired(now, window_secs) {
            state.count = 0;
            state.window_start = now;
        }

        let window_end = state.window_start + window_secs as u64;

        if state.count >= limit {
            let retry_after = (window_end.saturating_sub(now) as u32).max(1);
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

        state.count += 1;

        Ok(RateLimitResult::Allowed(RateLimitStatus {
            limit,
            remaining: limit.saturating_sub(state.count),
            reset_at: Timestamp::from_unix_secs(window_end),
            window_secs,
        }))
    }

    async fn status(&self, key: RateLimitKey) -> Result<RateLimitStatus, RateLimitError> {
        let (limit, window_secs) = self.config.limits_for(key.scope);
        let now = Self::now_secs();

        let windows = self.windows.read().await;
        let (count, window_start) = match windows.get(&key.to_redis_key()) {
            Some(state) if !state.expired(now, window_secs) => (state.count, state.window_start),
            _ => (0, now),
        };

        Ok(RateLimitStatus {
            limit,
            remaining: limit.saturating_sub(count),
            reset_at: Timestamp::from_unix_secs(window_start + window_secs as u64),
            window_secs,
        })
    }

    async fn reset(&self, key: RateLimitKey) -> Result<(), RateLimitError> {
        self.windows.write().await.remove(&key.to_redis_key());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::BusinessId;
    use crate::ports::RateLimitScope;

    fn limiter(per_ip: u32, per_business: u32) -> InMemoryRateLimiter {
        InMemoryRateLimiter::new(RateLimitConfig::new(per_ip, per_business, 60))
    }

    #[tokio::test]
    async fn allows_up_to_limit_then_denies() {
        let limiter = limiter(3, 100);
        let key = RateLimitKey::ip("10.0.0.1", "chat");

        for expected_remaining in [2, 1, 0] {
            match limiter.check(key.clone()).await.unwrap() {
                RateLimitResult::Allowed(status) => {
                    assert_eq!(status.remaining, expected_remaining)
                }
                RateLimitResult::Denied(_) => panic!("should be allowed"),
            }
        }

        match limiter.check(key).await.unwrap() {
            RateLimitResult::Denied(denied) => {
                assert_eq!(denied.limit, 3);
                assert_eq!(denied.scope, RateLimitScope::Ip);
                assert!(denied.retry_after_secs >= 1 && denied.retry_after_secs <= 60);
            }
            RateLimitResult::Allowed(_) => panic!("should be denied"),
        }
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let limiter = limiter(1, 100);
        assert!(limiter.check(RateLimitKey::ip("10.0.0.1", "chat")).await.unwrap().is_allowed());
        assert!(limiter.check(RateLimitKey::ip("10.0.0.2", "chat")).await.unwrap().is_allowed());
        assert!(!limiter.check(RateLimitKey::ip("10.0.0.1", "chat")).await.unwrap().is_allowed());
    }

    #[tokio::test]
    async fn business_scope_uses_business_limit() {
        let limiter = limiter(1, 2);
        let key = RateLimitKey::business(BusinessId::new(), "chat");
        assert!(limiter.check(key.clone()).await.unwrap().is_allowed());
        assert!(limiter.check(key.clone()).await.unwrap().is_allowed());
        assert!(!limiter.check(key).await.unwrap().is_allowed());
    }

    #[tokio::test]
    async fn status_does_not_consume() {
        let limiter = limiter(2, 100);
        let key = RateLimitKey::ip("10.0.0.1", "chat");
        limiter.check(key.clone()).await.unwrap();

        let status = limiter.status(key.clone()).await.unwrap();
        assert_eq!(status.remaining, 1);
        let status = limiter.status(key).await.unwrap();
        assert_eq!(status.remaining, 1);
    }

    #[tokio::test]
    async fn reset_clears_window() {
        let limiter = limiter(1, 100);
        let key = RateLimitKey::ip("10.0.0.1", "chat");
        limiter.check(key.clone()).await.unwrap();
        assert!(!limiter.check(key.clone()).await.unwrap().is_allowed());

        limiter.reset(key.clone()).await.unwrap();
        assert!(limiter.check(key).await.unwrap().is_allowed());
    }

    #[tokio::test]
    async fn expired_windows_are_pruned() {
        let limiter = InMemoryRateLimiter::new(RateLimitConfig::new(5, 100, 1));
        limiter.check(RateLimitKey::ip("10.0.0.1", "chat")).await.unwrap();
        limiter.check(RateLimitKey::ip("10.0.0.2", "chat")).await.unwrap();
        assert_eq!(limiter.tracked_keys().await, 2);

        tokio::time::sleep(std::time::Duration::from_millis(2100)).await;
        limiter.check(RateLimitKey::ip("10.0.0.3", "chat")).await.unwrap();

        assert_eq!(limiter.tracked_keys().await, 1);
    }
}
