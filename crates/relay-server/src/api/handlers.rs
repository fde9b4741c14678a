//! HTTP request handlers.

use super::types::{
    HealthResponse, InboundListParams, InboundListResponse, InboundWebhook, OutboundListParams,
    OutboundListResponse, RegisterUserRequest, SendMessageRequest, SendMessageResponse,
    UserListParams, UserView, UsersResponse,
};
use super::AppState;
use crate::error::RelayError;
use crate::relay::OutboundRequest;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::{Form, Json};
use message_ledger::{InboundQuery, OutboundQuery};
use tracing::{error, info};

/// Empty TwiML document acknowledging a transport webhook.
const EMPTY_TWIML: &str =
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response></Response>";

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_ok = state.store.health_check().await;

    Json(HealthResponse {
        status: if store_ok { "healthy".into() } else { "unhealthy".into() },
        simulated: state.ledger.simulated(),
        store: if store_ok { "connected".into() } else { "disconnected".into() },
        user_count: state.directory.count().await,
    })
}

/// Send an SMS to a registered user.
pub async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, RelayError> {
    let receipt = state
        .outbound
        .send(OutboundRequest {
            user_id: request.user_id,
            message_content: request.message_content,
            operator_id: request.operator_id,
            operator_name: request.operator_name,
            simulate_status: request.simulate_status,
        })
        .await?;

    Ok(Json(SendMessageResponse {
        status: receipt.status,
        message_id: receipt.message_id,
        user_id: receipt.user_id,
        masked_phone: receipt.masked_phone,
        timestamp: receipt.timestamp,
        gateway_reference: receipt.gateway_reference,
    }))
}

/// List outbound messages for the active simulation partition.
pub async fn list_outbound(
    State(state): State<AppState>,
    Query(params): Query<OutboundListParams>,
) -> Result<Json<OutboundListResponse>, RelayError> {
    let messages = state
        .ledger
        .list_outbound(&OutboundQuery {
            limit: params.limit,
            sort: params.sort,
            user_id: params.user_id,
            status: params.status,
            operator_id: params.operator_id,
        })
        .await?;

    Ok(Json(OutboundListResponse {
        status: "success".into(),
        count: messages.len(),
        simulated: state.ledger.simulated(),
        messages,
    }))
}

/// List inbound messages for the active simulation partition.
pub async fn list_inbound(
    State(state): State<AppState>,
    Query(params): Query<InboundListParams>,
) -> Result<Json<InboundListResponse>, RelayError> {
    let messages = state
        .ledger
        .list_inbound(&InboundQuery {
            limit: params.limit,
            sort: params.sort,
            user_id: params.user_id,
            is_registered: params.is_registered,
        })
        .await?;

    Ok(Json(InboundListResponse {
        status: "success".into(),
        count: messages.len(),
        simulated: state.ledger.simulated(),
        messages,
    }))
}

/// Register a new subscriber.
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<Json<UserView>, RelayError> {
    let record = state
        .directory
        .register_user(&request.phone_number, request.name)
        .await?;

    info!(user_id = %record.user_id, "Subscriber registered via API");
    Ok(Json(record.into()))
}

/// List subscribers, phone numbers masked.
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<UserListParams>,
) -> Result<Json<UsersResponse>, RelayError> {
    let users = state.directory.list_users(params.status).await?;

    Ok(Json(UsersResponse {
        status: "success".into(),
        count: users.len(),
        users: users.into_iter().map(UserView::from).collect(),
    }))
}

/// Receive an inbound SMS from the transport.
///
/// Fire-and-forget: the transport always gets a 200 with an empty TwiML
/// body, even when internal processing fails, to prevent upstream
/// retries.
pub async fn inbound_webhook(
    State(state): State<AppState>,
    Form(webhook): Form<InboundWebhook>,
) -> impl IntoResponse {
    if let Err(e) = state
        .inbound
        .receive(&webhook.from, &webhook.body, &webhook.message_sid)
        .await
    {
        error!("Error processing inbound message: {}", e);
    }

    ([(header::CONTENT_TYPE, "application/xml")], EMPTY_TWIML)
}

/// Delivery status callback from the transport. Stub for now.
pub async fn delivery_status() -> impl IntoResponse {
    info!("Delivery status callback received");
    axum::http::StatusCode::OK
}
