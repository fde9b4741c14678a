//! Outbound send orchestration.

use crate::error::RelayError;
use chrono::{DateTime, Utc};
use message_ledger::{privacy, Directory, Ledger, MessageStatus, Outcome};
use sms_gateway::{DeliveredAs, Gateway, SimulatedOutcome};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// A validated outbound send request.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub user_id: String,
    pub message_content: String,
    pub operator_id: String,
    pub operator_name: String,
    pub simulate_status: Option<SimulatedOutcome>,
}

/// What the operator gets back after a successful send.
#[derive(Debug, Clone)]
pub struct OutboundReceipt {
    pub status: MessageStatus,
    pub message_id: String,
    pub user_id: String,
    pub masked_phone: String,
    pub timestamp: DateTime<Utc>,
    pub gateway_reference: String,
}

/// Orchestrates validate → resolve → pre-log → dispatch → finalize.
#[derive(Clone)]
pub struct OutboundRelay {
    directory: Directory,
    ledger: Ledger,
    gateway: Arc<Gateway>,
}

impl OutboundRelay {
    pub fn new(directory: Directory, ledger: Ledger, gateway: Arc<Gateway>) -> Self {
        Self {
            directory,
            ledger,
            gateway,
        }
    }

    /// Send a message to a registered user.
    ///
    /// The recipient's phone number is resolved from the directory, held
    /// only in memory for the gateway call, and never written to the
    /// ledger. Validation and lookup failures reject before any side
    /// effect; the queued record exists before the gateway is invoked.
    #[instrument(skip(self, request), fields(operator_id = %request.operator_id))]
    pub async fn send(&self, request: OutboundRequest) -> Result<OutboundReceipt, RelayError> {
        if Uuid::parse_str(&request.user_id).is_err() {
            return Err(RelayError::InvalidUserId);
        }

        let body = request.message_content.trim();
        if body.is_empty() {
            return Err(RelayError::InvalidMessage);
        }

        let (phone_number, user) = self
            .directory
            .resolve_by_id(&request.user_id)
            .await?
            .ok_or_else(|| RelayError::UserNotFound(request.user_id.clone()))?;

        if !user.status.is_active() {
            return Err(RelayError::UserInactive);
        }

        // Pre-log the queued record; a crash from here on leaves an
        // auditable artifact rather than a silent loss.
        let queued = self
            .ledger
            .append_queued(&user.user_id, body, &request.operator_id, &request.operator_name)
            .await?;

        match self
            .gateway
            .dispatch(&phone_number, body, request.simulate_status)
            .await
        {
            Ok(receipt) => {
                let status = match receipt.delivered {
                    DeliveredAs::Sent => MessageStatus::Sent,
                    DeliveredAs::QueuedAtGateway => MessageStatus::Queued,
                };

                let finalized = self
                    .ledger
                    .finalize_outbound(
                        &queued.id,
                        Outcome::Delivered {
                            status,
                            reference: receipt.reference.clone(),
                        },
                    )
                    .await
                    .map_err(|e| {
                        // The gateway accepted the message; a failed
                        // finalization must be surfaced, not swallowed.
                        error!(
                            message_id = %queued.id,
                            reference = %receipt.reference,
                            "Failed to finalize sent message: {}", e
                        );
                        e
                    })?;

                info!(
                    message_id = %finalized.id,
                    user_id = %finalized.user_id,
                    "Outbound message sent"
                );

                Ok(OutboundReceipt {
                    status: finalized.status,
                    message_id: finalized.id,
                    user_id: finalized.user_id,
                    masked_phone: privacy::masked_display(&phone_number),
                    timestamp: finalized.sent_at.unwrap_or(finalized.queued_at),
                    gateway_reference: receipt.reference,
                })
            }
            Err(e) => {
                let detail = e.detail();
                let simulated = e.is_simulated();
                warn!(message_id = %queued.id, "Gateway dispatch failed: {}", detail);

                self.ledger
                    .finalize_outbound(
                        &queued.id,
                        Outcome::Failed {
                            detail: detail.clone(),
                        },
                    )
                    .await?;

                Err(RelayError::Gateway { detail, simulated })
            }
        }
    }
}
