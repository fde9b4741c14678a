//! SMS Relay Gateway - Entry point.

use message_ledger::DocumentStore;
use relay_server::api::{create_router, AppState};
use relay_server::config::Config;
use sms_gateway::{Gateway, SmsClient};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SMS Relay Gateway");

    // Select the gateway mode for the process lifetime
    let gateway = if config.gateway.simulate {
        Arc::new(Gateway::simulated())
    } else {
        let client = match SmsClient::new(
            &config.gateway.api_url,
            &config.gateway.account_sid,
            config.gateway.auth_token.clone(),
            &config.gateway.from_number,
            config.gateway.timeout,
        ) {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to create SMS transport client: {}", e);
                std::process::exit(1);
            }
        };

        if client.health_check().await {
            info!("SMS transport healthy at {}", config.gateway.api_url);
        } else {
            error!("SMS transport not reachable at {} - will retry on requests", config.gateway.api_url);
        }

        Arc::new(Gateway::live(client))
    };

    // Wire up the store, directory, ledger, and relays
    let store = DocumentStore::new();
    let state = AppState::new(store, gateway, config.relay.ack_message.clone());

    info!(simulated = state.ledger.simulated(), "Relay components ready");

    let app = create_router(state);

    // Bind to address
    let addr = SocketAddr::new(
        config.server.listen_addr.parse().unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    info!("Listening on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
