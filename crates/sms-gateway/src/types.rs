//! SMS transport API types.

use serde::{Deserialize, Serialize};

/// Successful send response from the transport API.
#[derive(Debug, Clone, Deserialize)]
pub struct SendSmsResponse {
    /// Provider message reference (e.g. "SM...")
    pub sid: String,
    pub status: Option<String>,
}

/// Error body returned by the transport API.
#[derive(Debug, Clone, Deserialize)]
pub struct SmsApiError {
    pub message: Option<String>,
    pub code: Option<i64>,
}

/// Desired outcome hint for a simulated dispatch.
///
/// Only honored in simulated mode; the live path always attempts a real
/// send regardless of the hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulatedOutcome {
    Sent,
    Queued,
    Failed,
}

/// How the gateway reports a successful dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveredAs {
    /// The transport accepted and sent the message.
    Sent,
    /// Simulated outcome: the message is held at the gateway as queued.
    QueuedAtGateway,
}

/// Result of a successful dispatch.
#[derive(Debug, Clone)]
pub struct DispatchReceipt {
    /// Provider (or synthesized) message reference.
    pub reference: String,
    pub delivered: DeliveredAs,
}
