//! HTTP API for the relay server.

mod handlers;
mod types;

pub use handlers::*;
pub use types::*;

use crate::relay::{InboundRelay, OutboundRelay};
use axum::routing::{get, post};
use axum::Router;
use message_ledger::{Directory, DocumentStore, Ledger};
use sms_gateway::Gateway;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Document store handle (health checks)
    pub store: DocumentStore,
    /// Phone identity directory
    pub directory: Directory,
    /// Message ledger, bound to the process simulation partition
    pub ledger: Ledger,
    /// Outbound send orchestration
    pub outbound: OutboundRelay,
    /// Inbound receipt orchestration
    pub inbound: InboundRelay,
}

impl AppState {
    /// Wire up the relay components around one store and one gateway.
    pub fn new(store: DocumentStore, gateway: Arc<Gateway>, ack_message: impl Into<String>) -> Self {
        let directory = Directory::new(store.clone());
        let ledger = Ledger::new(store.clone(), gateway.is_simulated());
        let outbound = OutboundRelay::new(directory.clone(), ledger.clone(), gateway.clone());
        let inbound = InboundRelay::new(
            directory.clone(),
            ledger.clone(),
            gateway,
            ack_message,
        );

        Self {
            store,
            directory,
            ledger,
            outbound,
            inbound,
        }
    }
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Operator API
        .route("/api/messages/send", post(handlers::send_message))
        .route("/api/messages/outbound", get(handlers::list_outbound))
        .route("/api/messages/inbound", get(handlers::list_inbound))
        .route("/api/users", get(handlers::list_users))
        .route("/api/users", post(handlers::register_user))
        // Transport webhooks
        .route("/gateway/inbound", post(handlers::inbound_webhook))
        .route("/gateway/status", post(handlers::delivery_status))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
