//! Integration tests for the public widget endpoints.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use common::{json_request, TestAppBuilder};
use hospitality_bot::adapters::ai::MockAIProvider;
use hospitality_bot::adapters::rate_limiter::RateLimitConfig;
use hospitality_bot::domain::tier::Tier;

#[tokio::test]
async fn health_is_public() {
    let app = TestAppBuilder::new(Tier::Starter).build().await;

    let response = app
        .send(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert!(response.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn fallback_chat_continues_the_same_conversation() {
    let app = TestAppBuilder::new(Tier::Starter).build().await;

    let first = app.chat(json!({ "message": "Hello there" })).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["source"], "fallback");
    assert!(first.body.get("model").is_none());
    let conversation_id = first.body["conversation_id"].as_str().unwrap().to_string();
    let guest_id = first.body["guest_id"].as_str().unwrap().to_string();
    assert!(guest_id.starts_with("guest-"));

    let second = app
        .chat(json!({
            "message": "Do you have a pool?",
            "conversation_id": conversation_id,
            "guest_id": guest_id,
        }))
        .await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["conversation_id"], conversation_id.as_str());
    assert_eq!(second.body["guest_id"], guest_id.as_str());
}

#[tokio::test]
async fn ai_reply_reports_model() {
    let ai = Arc::new(MockAIProvider::new().with_response("We have a heated pool on the roof."));
    let app = TestAppBuilder::new(Tier::Professional).with_ai(ai.clone()).build().await;

    let response = app.chat(json!({ "message": "Do you have a pool?" })).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["source"], "ai");
    assert_eq!(response.body["reply"], "We have a heated pool on the roof.");
    assert!(response.body["model"].is_string());
    assert_eq!(ai.call_count(), 1);
}

#[tokio::test]
async fn chat_validation_and_lookup_errors() {
    let app = TestAppBuilder::new(Tier::Starter).build().await;

    let blank = app.chat(json!({ "message": "   " })).await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
    assert_eq!(blank.body["code"], "VALIDATION_FAILED");

    let malformed = app
        .send(json_request("POST", "/api/widget/not-a-uuid/chat", None, json!({ "message": "Hi" })))
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);

    let unknown = app
        .send(json_request(
            "POST",
            &format!("/api/widget/{}/chat", uuid::Uuid::new_v4()),
            None,
            json!({ "message": "Hi" }),
        ))
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.body["code"], "BUSINESS_NOT_FOUND");

    let missing_field = app.chat(json!({ "text": "Hi" })).await;
    assert_eq!(missing_field.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_field.body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn chat_is_rate_limited_per_ip() {
    let app = TestAppBuilder::new(Tier::Starter)
        .with_limits(RateLimitConfig::new(2, 100, 60))
        .build()
        .await;

    for _ in 0..2 {
        let response = app.chat(json!({ "message": "Hello" })).await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let limited = app.chat(json!({ "message": "Hello" })).await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(limited.body["code"], "RATE_LIMITED");
    assert!(limited.headers.contains_key("retry-after"));

    // Config reads are not limited.
    let config = app
        .send(
            Request::builder()
                .uri(format!("/api/widget/{}/config", app.business_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(config.status, StatusCode::OK);
}

#[tokio::test]
async fn widget_config_forces_branding_below_premium() {
    let app = TestAppBuilder::new(Tier::Starter).build().await;

    let response = app
        .send(
            Request::builder()
                .uri(format!("/api/widget/{}/config", app.business_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["show_branding"], true);
    assert_eq!(response.body["business_id"], app.business_id.to_string());
    assert!(response.body["greeting"]
        .as_str()
        .unwrap()
        .contains("Lakeview Lodge"));
}

#[tokio::test]
async fn events_are_classified_into_stages() {
    let app = TestAppBuilder::new(Tier::Professional).build().await;

    let response = app.event("guest-42", "booking_link_clicked").await;
    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert_eq!(response.body["guest_id"], "guest-42");
    assert_eq!(response.body["stage"], "decision");
    assert_eq!(response.body["recorded"], true);

    let invalid = app.event("guest-42", "drop table;").await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
}
