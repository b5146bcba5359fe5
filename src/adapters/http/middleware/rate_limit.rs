//! Rate limiting for the public widget chat endpoint.
//!
//! Two fixed windows are checked per request: one keyed on the client IP and
//! one on the business named in the path, so a single noisy guest cannot
//! starve a hotel and a hotel cannot starve the platform.
//!
//! Status is reported in headers:
//! - `X-RateLimit-Limit` / `X-RateLimit-Remaining` / `X-RateLimit-Reset`
//! - `Retry-After` on 429
//!
//! Backend failures fail open.
//!
//! The per-IP key is the socket peer. Forwarding headers are honoured only
//! when the peer is a configured trusted proxy, and then the right-most hop
//! that is not itself a trusted proxy is used.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Path, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::adapters::http::error::ApiError;
use crate::domain::foundation::BusinessId;
use crate::ports::{RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter};

/// Limiter plus the proxies whose forwarding headers may be believed.
#[derive(Clone)]
pub struct RateLimiterState {
    limiter: Arc<dyn RateLimiter>,
    trusted_proxies: Arc<[IpAddr]>,
}

impl RateLimiterState {
    pub fn new(limiter: Arc<dyn RateLimiter>) -> Self {
        Self {
            limiter,
            trusted_proxies: Arc::from(Vec::new()),
        }
    }

    pub fn with_trusted_proxies(mut self, proxies: Vec<IpAddr>) -> Self {
        self.trusted_proxies = Arc::from(proxies);
        self
    }
}

/// Resource name under which chat requests are counted.
pub const CHAT_RESOURCE: &str = "chat";

pub mod headers {
    use super::HeaderName;

    pub static X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
    pub static X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
    pub static X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");
}

/// Must be attached with `route_layer` so the `:business_id` path parameter
/// is already matched.
pub async fn chat_rate_limit_middleware(
    State(state): State<RateLimiterState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    path: Option<Path<String>>,
    request: Request,
    next: Next,
) -> Response {
    let peer = connect_info.map(|ConnectInfo(addr)| addr.ip());
    let client_ip = extract_client_ip(request.headers(), peer, &state.trusted_proxies).map(|ip| ip.to_string());
    let business_id = path.and_then(|Path(raw)| raw.parse::<BusinessId>().ok());

    let mut tightest: Option<RateLimitStatus> = None;

    let keys = client_ip
        .as_deref()
        .map(|ip| RateLimitKey::ip(ip, CHAT_RESOURCE))
        .into_iter()
        .chain(business_id.map(|id| RateLimitKey::business(id, CHAT_RESOURCE)));

    for key in keys {
        match state.limiter.check(key.clone()).await {
            Ok(RateLimitResult::Allowed(status)) => {
                if tightest.as_ref().map_or(true, |t| status.remaining < t.remaining) {
                    tightest = Some(status);
                }
            }
            Ok(RateLimitResult::Denied(denied)) => {
                tracing::info!(
                    scope = %denied.scope,
                    identifier = %key.identifier,
                    limit = denied.limit,
                    "Chat rate limit exceeded"
                );
                let mut response =
                    ApiError::rate_limited(denied.retry_after_secs, denied.message).into_response();
                let headers = response.headers_mut();
                headers.insert(headers::X_RATELIMIT_LIMIT.clone(), HeaderValue::from(denied.limit));
                headers.insert(headers::X_RATELIMIT_REMAINING.clone(), HeaderValue::from(0u32));
                return response;
            }
            Err(e) => {
                tracing::warn!(scope = %key.scope, error = %e, "Rate limiter unavailable, allowing request");
            }
        }
    }

    let mut response = next.run(request).await;
    if let Some(status) = tightest {
        add_rate_limit_headers(&mut response, &status);
    }
    response
}

/// Client IP for the per-IP window.
///
/// An untrusted peer is the client. Behind a trusted proxy the
/// `X-Forwarded-For` chain is walked from the right, skipping trusted hops;
/// `X-Real-IP` is consulted only when the chain yields nothing. Without a
/// peer address there is no per-IP key.
fn extract_client_ip(headers: &HeaderMap, peer: Option<IpAddr>, trusted: &[IpAddr]) -> Option<IpAddr> {
    let peer = peer?;
    if !trusted.contains(&peer) {
        return Some(peer);
    }

    let hops: Vec<&str> = headers
        .get_all("X-Forwarded-For")
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(','))
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
        .collect();

    for hop in hops.iter().rev() {
        match hop.parse::<IpAddr>() {
            Ok(ip) if trusted.contains(&ip) => continue,
            Ok(ip) => return Some(ip),
            Err(_) => break,
        }
    }

    headers
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.trim().parse::<IpAddr>().ok())
        .or(Some(peer))
}

fn add_rate_limit_headers(response: &mut Response, status: &RateLimitStatus) {
    let headers = response.headers_mut();
    headers.insert(headers::X_RATELIMIT_LIMIT.clone(), HeaderValue::from(status.limit));
    headers.insert(headers::X_RATELIMIT_REMAINING.clone(), HeaderValue::from(status.remaining));
    headers.insert(
        headers::X_RATELIMIT_RESET.clone(),
        HeaderValue::from(status.reset_at.as_unix_secs()),
    );
}
