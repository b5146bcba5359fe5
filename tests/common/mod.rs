//! Shared harness for the HTTP integration tests: the full router over
//! in-memory adapters.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use hospitality_bot::adapters::auth::MockSessionValidator;
use hospitality_bot::adapters::http::{build_router, AppState};
use hospitality_bot::adapters::memory::{
    InMemoryBusinessRepository, InMemoryConversationRepository, InMemoryKnowledgeRepository,
    InMemoryTouchpointRepository,
};
use hospitality_bot::adapters::rate_limiter::{InMemoryRateLimiter, RateLimitConfig};
use hospitality_bot::application::ChatSettings;
use hospitality_bot::config::{ServerConfig, WidgetSettings};
use hospitality_bot::domain::business::{BusinessProfile, BusinessType};
use hospitality_bot::domain::foundation::{AuthenticatedUser, BusinessId, Role, UserId};
use hospitality_bot::domain::tier::Tier;
use hospitality_bot::ports::{AIProvider, BusinessRepository};

pub const OWNER_TOKEN: &str = "owner-token";
pub const STAFF_TOKEN: &str = "staff-token";

pub struct TestApp {
    pub router: Router,
    pub business_id: BusinessId,
}

pub struct TestAppBuilder {
    tier: Tier,
    ai: Option<Arc<dyn AIProvider>>,
    limits: RateLimitConfig,
}

impl TestAppBuilder {
    pub fn new(tier: Tier) -> Self {
        Self {
            tier,
            ai: None,
            limits: RateLimitConfig::new(1_000, 1_000, 60),
        }
    }

    pub fn with_ai(mut self, ai: Arc<dyn AIProvider>) -> Self {
        self.ai = Some(ai);
        self
    }

    pub fn with_limits(mut self, limits: RateLimitConfig) -> Self {
        self.limits = limits;
        self
    }

    pub async fn build(self) -> TestApp {
        let businesses = Arc::new(InMemoryBusinessRepository::new());
        let business = BusinessProfile::new("Lakeview Lodge", BusinessType::Hotel, self.tier).unwrap();
        businesses.save(&business).await.unwrap();

        let staff = AuthenticatedUser::new(UserId::new("staff-1").unwrap(), business.id, Role::Staff);
        let sessions = MockSessionValidator::new()
            .with_owner(OWNER_TOKEN, business.id)
            .with_user(STAFF_TOKEN, staff);

        let state = AppState {
            businesses,
            knowledge: Arc::new(InMemoryKnowledgeRepository::new()),
            conversations: Arc::new(InMemoryConversationRepository::new()),
            touchpoints: Arc::new(InMemoryTouchpointRepository::new()),
            ai: self.ai,
            sessions: Arc::new(sessions),
            limiter: Arc::new(InMemoryRateLimiter::new(self.limits)),
            chat: ChatSettings::default(),
            widget: WidgetSettings::default(),
        };

        TestApp {
            router: build_router(state, &ServerConfig::default()),
            business_id: business.id,
        }
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        TestResponse { status, headers, body }
    }

    pub async fn chat(&self, body: Value) -> TestResponse {
        self.send(json_request("POST", &format!("/api/widget/{}/chat", self.business_id), None, body))
            .await
    }

    pub async fn event(&self, guest_id: &str, event: &str) -> TestResponse {
        self.send(json_request(
            "POST",
            &format!("/api/widget/{}/events", self.business_id),
            None,
            serde_json::json!({ "guest_id": guest_id, "event": event }),
        ))
        .await
    }

    pub async fn dashboard_get(&self, path: &str, token: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().uri(format!("/api/dashboard{}", path));
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn dashboard_send(&self, method: &str, path: &str, token: &str, body: Value) -> TestResponse {
        self.send(json_request(method, &format!("/api/dashboard{}", path), Some(token), body))
            .await
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .extension(ConnectInfo(SocketAddr::from(([203, 0, 113, 7], 5000))));
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}
