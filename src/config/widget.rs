//! Public widget configuration

use std::net::IpAddr;

use serde::Deserialize;

use super::error::ValidationError;

/// Where the widget script is served from and how hard it may be hit.
#[derive(Debug, Clone, Deserialize)]
pub struct WidgetSettings {
    /// URL of the widget JavaScript bundle
    #[serde(default = "default_script_url")]
    pub script_url: String,

    /// Public base URL of this API, embedded in the snippet
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Chat requests allowed per client IP per window
    #[serde(default = "default_ip_limit")]
    pub chat_requests_per_ip: u32,

    /// Chat requests allowed per business per window
    #[serde(default = "default_business_limit")]
    pub chat_requests_per_business: u32,

    /// Rate limit window in seconds
    #[serde(default = "default_window")]
    pub rate_limit_window_secs: u32,

    /// Comma-separated proxy addresses whose X-Forwarded-For is believed
    #[serde(default)]
    pub trusted_proxies: Option<String>,
}

impl WidgetSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_absolute(&self.script_url) {
            return Err(ValidationError::InvalidWidgetUrl("WIDGET__SCRIPT_URL"));
        }
        if !is_absolute(&self.api_base_url) {
            return Err(ValidationError::InvalidWidgetUrl("WIDGET__API_BASE_URL"));
        }
        if self.chat_requests_per_ip == 0
            || self.chat_requests_per_business == 0
            || self.rate_limit_window_secs == 0
        {
            return Err(ValidationError::InvalidRateLimit);
        }
        for entry in self.trusted_proxy_entries() {
            if entry.parse::<IpAddr>().is_err() {
                return Err(ValidationError::InvalidTrustedProxy(entry.to_string()));
            }
        }
        Ok(())
    }

    /// Parsed trusted proxy addresses. Unparsable entries are skipped; they
    /// are rejected by `validate`.
    pub fn trusted_proxies_list(&self) -> Vec<IpAddr> {
        self.trusted_proxy_entries()
            .filter_map(|entry| entry.parse().ok())
            .collect()
    }

    fn trusted_proxy_entries(&self) -> impl Iterator<Item = &str> {
        self.trusted_proxies
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
    }
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            script_url: default_script_url(),
            api_base_url: default_api_base_url(),
            chat_requests_per_ip: default_ip_limit(),
            chat_requests_per_business: default_business_limit(),
            rate_limit_window_secs: default_window(),
            trusted_proxies: None,
        }
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

fn default_script_url() -> String {
    "http://localhost:8080/static/widget.js".to_string()
}

fn default_api_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_ip_limit() -> u32 {
    20
}

fn default_business_limit() -> u32 {
    600
}

fn default_window() -> u32 {
    60
}
