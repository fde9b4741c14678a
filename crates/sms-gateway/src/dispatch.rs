//! Gateway dispatcher: one surface over the live and simulated send paths.

use crate::client::SmsClient;
use crate::error::GatewayError;
use crate::types::{DeliveredAs, DispatchReceipt, SimulatedOutcome};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// SMS gateway with a live and a simulated backend.
///
/// The mode is chosen once at construction and governs every dispatch for
/// the process lifetime. The desired-outcome hint is only honored in
/// simulated mode.
pub enum Gateway {
    Live(SmsClient),
    Simulated,
}

impl Gateway {
    /// Create a live gateway backed by the real transport.
    pub fn live(client: SmsClient) -> Self {
        Gateway::Live(client)
    }

    /// Create a simulated gateway that never touches the transport.
    pub fn simulated() -> Self {
        info!("Gateway running in simulated mode");
        Gateway::Simulated
    }

    /// Whether this gateway is the simulated path.
    pub fn is_simulated(&self) -> bool {
        matches!(self, Gateway::Simulated)
    }

    /// Dispatch a message to `to`.
    ///
    /// Live mode sends through the transport and reports `Sent`. Simulated
    /// mode synthesizes a reference for `sent`/`queued` hints and fails
    /// with a [`GatewayError::SimulatedFailure`] for `failed`. A missing
    /// hint in simulated mode defaults to `sent`.
    #[instrument(skip(self, body))]
    pub async fn dispatch(
        &self,
        to: &str,
        body: &str,
        desired: Option<SimulatedOutcome>,
    ) -> Result<DispatchReceipt, GatewayError> {
        match self {
            Gateway::Live(client) => {
                let reference = client.send(to, body).await?;
                Ok(DispatchReceipt {
                    reference,
                    delivered: DeliveredAs::Sent,
                })
            }
            Gateway::Simulated => {
                match desired.unwrap_or(SimulatedOutcome::Sent) {
                    SimulatedOutcome::Failed => Err(GatewayError::SimulatedFailure(
                        "simulated transport rejection".into(),
                    )),
                    outcome => {
                        let receipt = DispatchReceipt {
                            reference: synthesize_reference(),
                            delivered: match outcome {
                                SimulatedOutcome::Queued => DeliveredAs::QueuedAtGateway,
                                _ => DeliveredAs::Sent,
                            },
                        };
                        debug!("Simulated dispatch, reference {}", receipt.reference);
                        Ok(receipt)
                    }
                }
            }
        }
    }
}

/// Synthesize a provider-shaped message reference for simulated sends.
fn synthesize_reference() -> String {
    format!("SM{}", Uuid::new_v4().simple())
}
