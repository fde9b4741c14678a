//! Configuration for the relay server, loaded from environment variables.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

/// Relay server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// SMS gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Relay behavior configuration
    #[serde(default)]
    pub relay: RelayConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// SMS transport REST API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Transport account identifier
    #[serde(default)]
    pub account_sid: String,

    /// Transport auth token
    #[serde(default = "default_auth_token")]
    pub auth_token: SecretString,

    /// Sender number in E.164 format
    #[serde(default)]
    pub from_number: String,

    /// Transport request timeout
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Run the simulated gateway instead of the live transport.
    /// Chosen once at startup; governs every send and every ledger read
    /// for the process lifetime.
    #[serde(default)]
    pub simulate: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Auto-acknowledgment text for registered senders
    #[serde(default = "default_ack_message")]
    pub ack_message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default implementations
impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            account_sid: String::new(),
            auth_token: default_auth_token(),
            from_number: String::new(),
            timeout: default_timeout(),
            simulate: false,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            ack_message: default_ack_message(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_api_url() -> String {
    "https://api.twilio.com".into()
}

fn default_auth_token() -> SecretString {
    SecretString::new(String::new())
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_ack_message() -> String {
    "Your number is recognized. Message received.".into()
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    // Note: try_parsing(true) would parse +16504928286 as a positive number
                    // stripping the + prefix. Keep strings as strings.
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
