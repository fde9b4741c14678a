//! Inbound receipt orchestration.

use crate::error::RelayError;
use message_ledger::{privacy, Directory, InboundMessage, Ledger};
use sms_gateway::Gateway;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Orchestrates resolve → optional acknowledgment → ledger append.
#[derive(Clone)]
pub struct InboundRelay {
    directory: Directory,
    ledger: Ledger,
    gateway: Arc<Gateway>,
    ack_message: String,
}

impl InboundRelay {
    pub fn new(
        directory: Directory,
        ledger: Ledger,
        gateway: Arc<Gateway>,
        ack_message: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            ledger,
            gateway,
            ack_message: ack_message.into(),
        }
    }

    /// Process one received message.
    ///
    /// Registered active senders get an auto-acknowledgment; an
    /// acknowledgment failure is logged and recorded, never fatal. The
    /// inbound record carries the user id or a correlation token — the
    /// raw phone number is not persisted. Only a ledger write failure is
    /// an error.
    #[instrument(skip(self, from_phone, body))]
    pub async fn receive(
        &self,
        from_phone: &str,
        body: &str,
        gateway_reference: &str,
    ) -> Result<InboundMessage, RelayError> {
        let active_sender = self
            .directory
            .resolve_by_phone(from_phone)
            .await?
            .filter(|(_, user)| user.status.is_active());
        let is_registered = active_sender.is_some();

        let mut response_sent = false;
        if is_registered {
            // The desired-outcome hint stays unset for acknowledgments;
            // simulated mode treats that as a successful send.
            match self.gateway.dispatch(from_phone, &self.ack_message, None).await {
                Ok(_) => {
                    response_sent = true;
                    info!("Acknowledgment sent");
                }
                Err(e) => {
                    warn!("Failed to send acknowledgment: {}", e);
                }
            }
        }

        let log_id = match active_sender {
            Some((user_id, _)) => user_id,
            None => privacy::correlation_token(from_phone),
        };

        let record = self
            .ledger
            .append_inbound(InboundMessage::new(
                log_id,
                body,
                is_registered,
                response_sent,
                gateway_reference,
                self.ledger.simulated(),
            ))
            .await?;

        info!(
            message_id = %record.id,
            registered = is_registered,
            acknowledged = response_sent,
            "Inbound message recorded"
        );

        Ok(record)
    }
}
