//! Integration tests for the authenticated dashboard endpoints.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{TestAppBuilder, OWNER_TOKEN, STAFF_TOKEN};
use hospitality_bot::domain::tier::Tier;

fn parking_item() -> Value {
    json!({
        "question": "Is there parking?",
        "answer": "Yes, free parking is available on site.",
        "category": "facilities",
        "keywords": ["parking", "car"],
    })
}

#[tokio::test]
async fn dashboard_requires_a_token() {
    let app = TestAppBuilder::new(Tier::Starter).build().await;

    let missing = app.dashboard_get("/knowledge", None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["code"], "UNAUTHORIZED");

    let forged = app.dashboard_get("/knowledge", Some("forged")).await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn knowledge_crud_round() {
    let app = TestAppBuilder::new(Tier::Starter).build().await;

    let created = app.dashboard_send("POST", "/knowledge", STAFF_TOKEN, parking_item()).await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["id"].as_str().unwrap().to_string();
    assert_eq!(created.body["business_id"], app.business_id.to_string());

    let listed = app.dashboard_get("/knowledge", Some(STAFF_TOKEN)).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["total"], 1);

    let found = app
        .dashboard_get("/knowledge/search?q=where%20can%20I%20park%20my%20car", Some(STAFF_TOKEN))
        .await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["results"][0]["item"]["id"], id.as_str());

    let mut edited = parking_item();
    edited["answer"] = json!("Yes, 20 spaces behind the lodge.");
    let updated = app
        .dashboard_send("PUT", &format!("/knowledge/{}", id), OWNER_TOKEN, edited)
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["answer"], "Yes, 20 spaces behind the lodge.");

    let deleted = app
        .dashboard_send("DELETE", &format!("/knowledge/{}", id), OWNER_TOKEN, Value::Null)
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let again = app
        .dashboard_send("DELETE", &format!("/knowledge/{}", id), OWNER_TOKEN, Value::Null)
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
    assert_eq!(again.body["code"], "KNOWLEDGE_ITEM_NOT_FOUND");
}

#[tokio::test]
async fn knowledge_validation_errors() {
    let app = TestAppBuilder::new(Tier::Starter).build().await;

    let blank = app
        .dashboard_send("POST", "/knowledge", OWNER_TOKEN, json!({ "question": "Pets?", "answer": " " }))
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let empty_query = app.dashboard_get("/knowledge/search?q=", Some(OWNER_TOKEN)).await;
    assert_eq!(empty_query.status, StatusCode::BAD_REQUEST);

    let bad_id = app
        .dashboard_send("PUT", "/knowledge/not-an-id", OWNER_TOKEN, parking_item())
        .await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn knowledge_base_answers_guests_without_ai() {
    let app = TestAppBuilder::new(Tier::Starter).build().await;
    app.dashboard_send("POST", "/knowledge", OWNER_TOKEN, parking_item()).await;

    let reply = app.chat(json!({ "message": "Do you have parking?" })).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["source"], "knowledge_base");
    assert_eq!(reply.body["reply"], "Yes, free parking is available on site.");
}

#[tokio::test]
async fn funnel_is_gated_by_tier() {
    let starter = TestAppBuilder::new(Tier::Starter).build().await;

    let denied = starter.dashboard_get("/analytics/funnel", Some(OWNER_TOKEN)).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(denied.body["code"], "FEATURE_NOT_AVAILABLE");
    assert_eq!(
        denied.body["message"],
        "journey_analytics is not available on the Starter plan"
    );
}

#[tokio::test]
async fn funnel_counts_guests_and_conversions() {
    let app = TestAppBuilder::new(Tier::Professional).build().await;
    app.event("guest-a", "page_view").await;
    app.event("guest-a", "booking_started").await;
    app.event("guest-b", "page_view").await;

    let report = app.dashboard_get("/analytics/funnel?days=7", Some(STAFF_TOKEN)).await;

    assert_eq!(report.status, StatusCode::OK);
    assert_eq!(report.body["days"], 7);
    assert_eq!(report.body["total_guests"], 2);

    let out_of_range = app.dashboard_get("/analytics/funnel?days=0", Some(STAFF_TOKEN)).await;
    assert_eq!(out_of_range.status, StatusCode::BAD_REQUEST);

    let not_a_number = app.dashboard_get("/analytics/funnel?days=lots", Some(STAFF_TOKEN)).await;
    assert_eq!(not_a_number.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn guest_journey_follows_touchpoints() {
    let app = TestAppBuilder::new(Tier::Professional).build().await;
    app.event("guest-a", "page_view").await;
    app.event("guest-a", "pricing_viewed").await;

    let journey = app
        .dashboard_get("/analytics/journeys/guest-a", Some(OWNER_TOKEN))
        .await;
    assert_eq!(journey.status, StatusCode::OK);
    assert_eq!(journey.body["touchpoint_count"], 2);
    assert_eq!(journey.body["furthest_stage"], "consideration");
    assert_eq!(journey.body["converted"], false);

    let stranger = app
        .dashboard_get("/analytics/journeys/guest-unknown", Some(OWNER_TOKEN))
        .await;
    assert_eq!(stranger.status, StatusCode::OK);
    assert_eq!(stranger.body["touchpoint_count"], 0);
}

#[tokio::test]
async fn repeated_unanswered_questions_become_gaps_on_premium() {
    let app = TestAppBuilder::new(Tier::Premium).build().await;
    for _ in 0..2 {
        app.chat(json!({ "message": "Can I bring my drone?" })).await;
    }

    let report = app.dashboard_get("/analytics/knowledge-gaps", Some(OWNER_TOKEN)).await;

    assert_eq!(report.status, StatusCode::OK);
    let gaps = report.body["gaps"].as_array().unwrap();
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0]["occurrences"], 2);
}

#[tokio::test]
async fn knowledge_gaps_need_premium() {
    let app = TestAppBuilder::new(Tier::Professional).build().await;

    let report = app.dashboard_get("/analytics/knowledge-gaps", Some(OWNER_TOKEN)).await;

    assert_eq!(report.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn embed_code_and_widget_settings() {
    let app = TestAppBuilder::new(Tier::Premium).build().await;

    let embed = app.dashboard_get("/widget/embed-code", Some(STAFF_TOKEN)).await;
    assert_eq!(embed.status, StatusCode::OK);
    let snippet = embed.body["snippet"].as_str().unwrap();
    assert!(snippet.contains(&format!("data-business-id=\"{}\"", app.business_id)));

    let staff = app
        .dashboard_send("PUT", "/widget/config", STAFF_TOKEN, json!({ "primary_color": "#112233" }))
        .await;
    assert_eq!(staff.status, StatusCode::FORBIDDEN);

    let owner = app
        .dashboard_send(
            "PUT",
            "/widget/config",
            OWNER_TOKEN,
            json!({ "primary_color": "#112233", "position": "bottom_left", "show_branding": false }),
        )
        .await;
    assert_eq!(owner.status, StatusCode::OK);
    assert_eq!(owner.body["primary_color"], "#112233");
    assert_eq!(owner.body["position"], "bottom_left");
    assert_eq!(owner.body["show_branding"], false);

    let bad_color = app
        .dashboard_send("PUT", "/widget/config", OWNER_TOKEN, json!({ "primary_color": "red" }))
        .await;
    assert_eq!(bad_color.status, StatusCode::BAD_REQUEST);
}
