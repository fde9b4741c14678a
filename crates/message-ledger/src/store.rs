//! In-memory document store backing the directory and the ledger.

use crate::types::{InboundMessage, OutboundMessage, UserRecord};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Handle to the document collections.
///
/// Stands in for the external document store at the same boundary: keyed
/// get/insert, equality scans, one sort key, a row limit. Cloning shares
/// the underlying collections; only the directory and the ledger touch
/// them.
#[derive(Clone, Default)]
pub struct DocumentStore {
    /// `users` collection, keyed by phone number (the natural key)
    pub(crate) users: Arc<RwLock<HashMap<String, UserRecord>>>,
    /// `outgoingMessages` collection, keyed by ledger-assigned id
    pub(crate) outbound: Arc<RwLock<HashMap<String, OutboundMessage>>>,
    /// `incomingMessages` collection, keyed by ledger-assigned id
    pub(crate) inbound: Arc<RwLock<HashMap<String, InboundMessage>>>,
}

impl DocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the store is reachable. Always true for the in-memory
    /// backend; kept so callers do not assume it.
    pub async fn health_check(&self) -> bool {
        true
    }
}
