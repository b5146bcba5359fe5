//! Limits applied by the rate limiter adapters.

use crate::config::WidgetSettings;
use crate::ports::RateLimitScope;

/// Fixed-window limits for the public widget surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests per window from one client IP.
    pub per_ip: u32,
    /// Requests per window across all guests of one business.
    pub per_business: u32,
    pub window_secs: u32,
}

impl RateLimitConfig {
    pub fn new(per_ip: u32, per_business: u32, window_secs: u32) -> Self {
        Self {
            per_ip,
            per_business,
            window_secs,
        }
    }

    /// Limit for a scope, with the shared window length.
    pub fn limits_for(&self, scope: RateLimitScope) -> (u32, u32) {
        let limit = match scope {
            RateLimitScope::Ip => self.per_ip,
            RateLimitScope::Business => self.per_business,
        };
        (limit, self.window_secs)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::from(&WidgetSettings::default())
    }
}

impl From<&WidgetSettings> for RateLimitConfig {
    fn from(settings: &WidgetSettings) -> Self {
        Self::new(
            settings.chat_requests_per_ip,
            settings.chat_requests_per_business,
            settings.rate_limit_window_secs,
        )
    }
}
