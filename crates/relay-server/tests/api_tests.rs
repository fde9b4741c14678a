//! Integration tests for the relay server API.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use message_ledger::{DocumentStore, UserRecord, UserStatus};
use relay_server::api::{create_router, AppState};
use secrecy::SecretString;
use sms_gateway::{Gateway, SmsClient};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const ACK: &str = "Your number is recognized. Message received.";

/// State backed by a simulated gateway and an empty store.
fn simulated_state() -> AppState {
    AppState::new(DocumentStore::new(), Arc::new(Gateway::simulated()), ACK)
}

/// State backed by a live gateway pointing at an unreachable transport.
fn unreachable_live_state(store: DocumentStore) -> AppState {
    let client = SmsClient::new(
        "http://127.0.0.1:1",
        "AC00000000000000000000000000000000",
        SecretString::new("test-token".into()),
        "+15005550006",
        Duration::from_millis(200),
    )
    .unwrap();
    AppState::new(store, Arc::new(Gateway::live(client)), ACK)
}

async fn register_active_user(state: &AppState, phone: &str) -> UserRecord {
    state
        .directory
        .register_user(phone, Some("Test User".into()))
        .await
        .unwrap()
}

async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
    let state = simulated_state();
    let app = create_router(state);

    let (status, json) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["simulated"], true);
    assert_eq!(json["store"], "connected");
    assert_eq!(json["userCount"], 0);
}

#[tokio::test]
async fn test_send_rejects_malformed_user_id() {
    let state = simulated_state();
    let app = create_router(state.clone());

    let (status, json) = post_json(
        app,
        "/api/messages/send",
        serde_json::json!({
            "userId": "not-a-uuid",
            "messageContent": "hello",
            "operatorId": "op-1"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "invalid_user_id");

    // No side effect
    let rows = state
        .ledger
        .list_outbound(&Default::default())
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_send_rejects_blank_message() {
    let state = simulated_state();
    let user = register_active_user(&state, "+14155551234").await;
    let app = create_router(state.clone());

    let (status, json) = post_json(
        app,
        "/api/messages/send",
        serde_json::json!({
            "userId": user.user_id,
            "messageContent": "   ",
            "operatorId": "op-1"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "invalid_message");

    let rows = state
        .ledger
        .list_outbound(&Default::default())
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_send_to_unknown_user() {
    let state = simulated_state();
    let app = create_router(state.clone());

    let (status, json) = post_json(
        app,
        "/api/messages/send",
        serde_json::json!({
            "userId": "7f0b2f9c-1111-4222-8333-444455556666",
            "messageContent": "hello",
            "operatorId": "op-1"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "user_not_found");

    // Rejected before any ledger write
    let rows = state
        .ledger
        .list_outbound(&Default::default())
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_send_to_inactive_user() {
    let state = simulated_state();
    let user = register_active_user(&state, "+14155551234").await;
    state
        .directory
        .set_status("+14155551234", UserStatus::Inactive)
        .await
        .unwrap();
    let app = create_router(state.clone());

    let (status, json) = post_json(
        app,
        "/api/messages/send",
        serde_json::json!({
            "userId": user.user_id,
            "messageContent": "hello",
            "operatorId": "op-1"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "user_inactive");

    let rows = state
        .ledger
        .list_outbound(&Default::default())
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_simulated_send_success_masks_phone() {
    let state = simulated_state();
    let user = register_active_user(&state, "+14155551234").await;
    let app = create_router(state.clone());

    let (status, json) = post_json(
        app,
        "/api/messages/send",
        serde_json::json!({
            "userId": user.user_id.clone(),
            "messageContent": "hello there",
            "operatorId": "op-1",
            "operatorName": "Alex"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "sent");
    assert_eq!(json["userId"], user.user_id);
    assert_eq!(json["maskedPhone"], "***-***-1234");
    assert!(json["gatewayReference"]
        .as_str()
        .unwrap()
        .starts_with("SM"));
    // The raw phone never appears in the response
    assert!(!json.to_string().contains("+14155551234"));

    // Ledger holds the finalized record
    let rows = state
        .ledger
        .list_outbound(&Default::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, message_ledger::MessageStatus::Sent);
    assert!(rows[0].sent_at.is_some());
    assert!(rows[0].simulated);
    assert_eq!(rows[0].operator_name, "Alex");
}

#[tokio::test]
async fn test_simulated_send_failure_finalizes_failed() {
    let state = simulated_state();
    let user = register_active_user(&state, "+14155551234").await;
    let app = create_router(state.clone());

    let (status, json) = post_json(
        app,
        "/api/messages/send",
        serde_json::json!({
            "userId": user.user_id,
            "messageContent": "hello",
            "operatorId": "op-1",
            "simulateStatus": "failed"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "send_error");
    assert_eq!(json["simulated"], true);

    // queued → failed with the simulated detail recorded
    let rows = state
        .ledger
        .list_outbound(&Default::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, message_ledger::MessageStatus::Failed);
    assert!(rows[0]
        .gateway_error
        .as_deref()
        .unwrap()
        .contains("Simulated"));
    assert!(rows[0].sent_at.is_none());
}

#[tokio::test]
async fn test_simulated_send_queued_outcome() {
    let state = simulated_state();
    let user = register_active_user(&state, "+14155551234").await;
    let app = create_router(state.clone());

    let (status, json) = post_json(
        app,
        "/api/messages/send",
        serde_json::json!({
            "userId": user.user_id,
            "messageContent": "hello",
            "operatorId": "op-1",
            "simulateStatus": "queued"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "queued");

    let rows = state
        .ledger
        .list_outbound(&Default::default())
        .await
        .unwrap();
    assert!(rows[0].gateway_reference.is_some());
    assert!(rows[0].is_final());
}

#[tokio::test]
async fn test_inbound_webhook_unknown_sender() {
    let state = simulated_state();
    let app = create_router(state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/gateway/inbound")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(
                    "From=%2B19995550000&Body=who+is+this&MessageSid=SMin1",
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("<Response>"));

    let rows = state
        .ledger
        .list_inbound(&Default::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert!(!rows[0].is_registered);
    assert!(!rows[0].response_sent);
    // Correlation token, not a phone number
    assert!(rows[0].user_id.starts_with("unknown_"));
    assert!(!rows[0].user_id.contains("9995550000"));
}

#[tokio::test]
async fn test_inbound_webhook_missing_sender_still_acknowledged() {
    let state = simulated_state();
    let app = create_router(state.clone());

    // A webhook without From must still get its 200 so the transport
    // does not retry
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/gateway/inbound")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("Body=hi&MessageSid=SMx"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("<Response>"));

    let rows = state
        .ledger
        .list_inbound(&Default::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert!(!rows[0].is_registered);
    assert!(rows[0].user_id.starts_with("unknown_"));
}

#[tokio::test]
async fn test_inbound_webhook_registered_sender_acknowledged() {
    let state = simulated_state();
    let user = register_active_user(&state, "+14155551234").await;
    let app = create_router(state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/gateway/inbound")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("From=%2B14155551234&Body=hi&MessageSid=SMin2"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let rows = state
        .ledger
        .list_inbound(&Default::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].is_registered);
    assert!(rows[0].response_sent);
    assert_eq!(rows[0].user_id, user.user_id);
}

#[tokio::test]
async fn test_inbound_ack_failure_still_records_message() {
    // Live gateway pointing at an unreachable transport: the
    // acknowledgment send fails but the inbound record survives.
    let store = DocumentStore::new();
    let state = unreachable_live_state(store);
    let user = register_active_user(&state, "+14155551234").await;
    let app = create_router(state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/gateway/inbound")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("From=%2B14155551234&Body=hi&MessageSid=SMin3"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let rows = state
        .ledger
        .list_inbound(&Default::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].is_registered);
    assert!(!rows[0].response_sent);
    assert_eq!(rows[0].user_id, user.user_id);
}

#[tokio::test]
async fn test_inbound_inactive_sender_not_acknowledged() {
    let state = simulated_state();
    register_active_user(&state, "+14155551234").await;
    state
        .directory
        .set_status("+14155551234", UserStatus::Inactive)
        .await
        .unwrap();
    let app = create_router(state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/gateway/inbound")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("From=%2B14155551234&Body=hi&MessageSid=SMin4"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    // Inactive senders look like unregistered numbers for inbound purposes
    let rows = state
        .ledger
        .list_inbound(&Default::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert!(!rows[0].is_registered);
    assert!(!rows[0].response_sent);
    assert!(rows[0].user_id.starts_with("unknown_"));
}

#[tokio::test]
async fn test_listing_respects_simulation_partition() {
    // Two servers over the same store, one per mode: writes from the
    // simulated side never appear in the live listings.
    let store = DocumentStore::new();
    let sim_state = AppState::new(store.clone(), Arc::new(Gateway::simulated()), ACK);
    let live_state = unreachable_live_state(store);

    let user = register_active_user(&sim_state, "+14155551234").await;
    let sim_app = create_router(sim_state.clone());

    let (status, _) = post_json(
        sim_app,
        "/api/messages/send",
        serde_json::json!({
            "userId": user.user_id,
            "messageContent": "simulated traffic",
            "operatorId": "op-1"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, sim_json) = get_json(create_router(sim_state), "/api/messages/outbound").await;
    assert_eq!(sim_json["count"], 1);
    assert_eq!(sim_json["simulated"], true);

    let (_, live_json) = get_json(create_router(live_state), "/api/messages/outbound").await;
    assert_eq!(live_json["count"], 0);
    assert_eq!(live_json["simulated"], false);
}

#[tokio::test]
async fn test_outbound_listing_filters() {
    let state = simulated_state();
    let user = register_active_user(&state, "+14155551234").await;

    for (content, outcome) in [("one", "sent"), ("two", "failed")] {
        let app = create_router(state.clone());
        post_json(
            app,
            "/api/messages/send",
            serde_json::json!({
                "userId": user.user_id.clone(),
                "messageContent": content,
                "operatorId": "op-1",
                "simulateStatus": outcome
            }),
        )
        .await;
    }

    let (_, all) = get_json(create_router(state.clone()), "/api/messages/outbound").await;
    assert_eq!(all["count"], 2);

    let (_, failed) = get_json(
        create_router(state.clone()),
        "/api/messages/outbound?status=failed",
    )
    .await;
    assert_eq!(failed["count"], 1);
    assert_eq!(failed["messages"][0]["messageContent"], "two");

    let (_, limited) = get_json(
        create_router(state),
        "/api/messages/outbound?limit=1&sort=asc",
    )
    .await;
    assert_eq!(limited["count"], 1);
    assert_eq!(limited["messages"][0]["messageContent"], "one");
}

#[tokio::test]
async fn test_register_and_list_users_masks_phone() {
    let state = simulated_state();
    let app = create_router(state.clone());

    let (status, json) = post_json(
        app,
        "/api/users",
        serde_json::json!({
            "phoneNumber": "+14155551234",
            "name": "Ada"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["maskedPhone"], "***-***-1234");
    assert!(!json.to_string().contains("+14155551234"));

    let (status, listing) = get_json(create_router(state.clone()), "/api/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["count"], 1);
    assert_eq!(listing["users"][0]["maskedPhone"], "***-***-1234");
    assert!(!listing.to_string().contains("+14155551234"));

    // Duplicate registration is rejected
    let (status, dup) = post_json(
        create_router(state),
        "/api/users",
        serde_json::json!({ "phoneNumber": "+14155551234" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(dup["code"], "already_registered");
}

#[tokio::test]
async fn test_delivery_status_stub() {
    let state = simulated_state();
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/gateway/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
