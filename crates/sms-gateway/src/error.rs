//! SMS transport and gateway errors.

use thiserror::Error;

/// Errors from the live SMS transport.
#[derive(Error, Debug)]
pub enum SmsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Send failed: {0}")]
    SendFailed(String),
}

/// Errors from a dispatch attempt, live or simulated.
///
/// The two variants are distinguishable so a simulated failure is never
/// mistaken for a real transport fault, but callers finalize the ledger
/// the same way for both.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(#[from] SmsError),

    #[error("Simulated gateway failure: {0}")]
    SimulatedFailure(String),
}

impl GatewayError {
    /// Whether this failure came from the simulated path.
    pub fn is_simulated(&self) -> bool {
        matches!(self, GatewayError::SimulatedFailure(_))
    }

    /// Human-readable detail for ledger finalization.
    pub fn detail(&self) -> String {
        self.to_string()
    }
}
