//! Rate limiter adapters.
//!
//! - [`InMemoryRateLimiter`] - single process, tests and development
//! - [`RedisRateLimiter`] - shared counters for multi-node deployments

mod config;
mod in_memory;
mod redis;

pub use config::RateLimitConfig;
pub use in_memory::InMemoryRateLimiter;
pub use redis::RedisRateLimiter;
