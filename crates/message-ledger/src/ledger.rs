//! Message ledger: durable, append-mostly record store for message events.
//!
//! Owns the lifecycle of outbound and inbound records. Outbound records
//! are written in `queued` state before the gateway is invoked and
//! finalized exactly once afterwards. Every read and write is partitioned
//! by the simulation flag fixed at construction; live and simulated data
//! never intermix.

use crate::error::StoreError;
use crate::store::DocumentStore;
use crate::types::{
    InboundMessage, InboundQuery, MessageStatus, OutboundMessage, OutboundQuery, SortOrder,
    DEFAULT_LIST_LIMIT,
};
use chrono::Utc;
use tracing::{debug, info, instrument};

/// Terminal outcome applied by the one-shot finalization.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The gateway accepted the message.
    Delivered {
        /// Terminal status: `sent`, or `queued` for the simulated
        /// queued-at-gateway outcome
        status: MessageStatus,
        reference: String,
    },
    /// The gateway raised, live or simulated.
    Failed { detail: String },
}

/// Ledger over the outbound and inbound collections.
#[derive(Clone)]
pub struct Ledger {
    store: DocumentStore,
    simulated: bool,
}

impl Ledger {
    /// Create a ledger bound to one side of the simulation partition.
    pub fn new(store: DocumentStore, simulated: bool) -> Self {
        Self { store, simulated }
    }

    /// Which side of the partition this ledger reads and writes.
    pub fn simulated(&self) -> bool {
        self.simulated
    }

    /// Write an outbound record in `queued` state.
    ///
    /// Called synchronously before the gateway dispatch so a crash in
    /// between leaves an auditable record.
    #[instrument(skip(self, message_content, operator_name))]
    pub async fn append_queued(
        &self,
        user_id: &str,
        message_content: &str,
        operator_id: &str,
        operator_name: &str,
    ) -> Result<OutboundMessage, StoreError> {
        let record = OutboundMessage::new_queued(
            user_id,
            message_content,
            operator_id,
            operator_name,
            self.simulated,
        );

        let mut outbound = self.store.outbound.write().await;
        outbound.insert(record.id.clone(), record.clone());

        debug!(message_id = %record.id, "Outbound message queued");
        Ok(record)
    }

    /// Apply the terminal outcome to a queued record, exactly once.
    ///
    /// Fails with [`StoreError::AlreadyFinal`] if the record was finalized
    /// before; a terminal state never transitions again.
    #[instrument(skip(self, outcome))]
    pub async fn finalize_outbound(
        &self,
        id: &str,
        outcome: Outcome,
    ) -> Result<OutboundMessage, StoreError> {
        let mut outbound = self.store.outbound.write().await;
        let record = outbound
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.into()))?;

        if record.is_final() {
            return Err(StoreError::AlreadyFinal(id.into()));
        }

        match outcome {
            Outcome::Delivered { status, reference } => {
                record.status = status;
                record.sent_at = Some(Utc::now());
                record.gateway_reference = Some(reference);
            }
            Outcome::Failed { detail } => {
                record.status = MessageStatus::Failed;
                record.gateway_error = Some(detail);
            }
        }

        info!(message_id = %id, status = ?record.status, "Outbound message finalized");
        Ok(record.clone())
    }

    /// Fetch an outbound record by id, respecting the partition.
    pub async fn get_outbound(&self, id: &str) -> Result<Option<OutboundMessage>, StoreError> {
        let outbound = self.store.outbound.read().await;
        Ok(outbound
            .get(id)
            .filter(|r| r.simulated == self.simulated)
            .cloned())
    }

    /// Append an immutable inbound record.
    #[instrument(skip(self, record))]
    pub async fn append_inbound(
        &self,
        mut record: InboundMessage,
    ) -> Result<InboundMessage, StoreError> {
        record.simulated = self.simulated;

        let mut inbound = self.store.inbound.write().await;
        inbound.insert(record.id.clone(), record.clone());

        debug!(message_id = %record.id, registered = record.is_registered, "Inbound message logged");
        Ok(record)
    }

    /// Fetch an inbound record by id, respecting the partition.
    pub async fn get_inbound(&self, id: &str) -> Result<Option<InboundMessage>, StoreError> {
        let inbound = self.store.inbound.read().await;
        Ok(inbound
            .get(id)
            .filter(|r| r.simulated == self.simulated)
            .cloned())
    }

    /// List outbound records: partition first, then explicit filters,
    /// sort by `queued_at`, limit.
    pub async fn list_outbound(
        &self,
        query: &OutboundQuery,
    ) -> Result<Vec<OutboundMessage>, StoreError> {
        let outbound = self.store.outbound.read().await;
        let mut records: Vec<OutboundMessage> = outbound
            .values()
            .filter(|r| r.simulated == self.simulated)
            .filter(|r| match &query.user_id {
                Some(id) => &r.user_id == id,
                None => true,
            })
            .filter(|r| match query.status {
                Some(s) => r.status == s,
                None => true,
            })
            .filter(|r| match &query.operator_id {
                Some(op) => &r.operator_id == op,
                None => true,
            })
            .cloned()
            .collect();

        records.sort_by_key(|r| r.queued_at);
        if query.sort == SortOrder::Desc {
            records.reverse();
        }
        records.truncate(query.limit.unwrap_or(DEFAULT_LIST_LIMIT));

        Ok(records)
    }

    /// List inbound records: partition first, then explicit filters,
    /// sort by `timestamp`, limit.
    pub async fn list_inbound(
        &self,
        query: &InboundQuery,
    ) -> Result<Vec<InboundMessage>, StoreError> {
        let inbound = self.store.inbound.read().await;
        let mut records: Vec<InboundMessage> = inbound
            .values()
            .filter(|r| r.simulated == self.simulated)
            .filter(|r| match &query.user_id {
                Some(id) => &r.user_id == id,
                None => true,
            })
            .filter(|r| match query.is_registered {
                Some(reg) => r.is_registered == reg,
                None => true,
            })
            .cloned()
            .collect();

        records.sort_by_key(|r| r.timestamp);
        if query.sort == SortOrder::Desc {
            records.reverse();
        }
        records.truncate(query.limit.unwrap_or(DEFAULT_LIST_LIMIT));

        Ok(records)
    }
}
