//! User and message record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subscriber eligibility status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    /// Only active users may send or receive.
    pub fn is_active(&self) -> bool {
        matches!(self, UserStatus::Active)
    }
}

/// A registered subscriber.
///
/// The phone number is the natural key of the backing collection; the
/// user id is the opaque identifier every message record carries instead
/// of the phone number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Phone number in E.164 format (e.g. "+14155551234")
    pub phone_number: String,

    /// Opaque identifier, stable for the user's lifetime, never reused
    pub user_id: String,

    pub name: Option<String>,

    pub status: UserStatus,

    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Create an active user with a fresh opaque identifier.
    pub fn new(phone_number: impl Into<String>, name: Option<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            user_id: Uuid::new_v4().to_string(),
            name,
            status: UserStatus::Active,
            created_at: Utc::now(),
        }
    }
}

/// Outbound message status.
///
/// `Queued` is the initial state. `Sent` and `Failed` are terminal, and a
/// simulated `queued` outcome is terminal as well; [`OutboundMessage::is_final`]
/// tracks terminality independent of the label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Queued,
    Sent,
    Failed,
}

/// One attempted outbound send. Never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    /// Ledger-assigned identifier
    pub id: String,

    /// Recipient's opaque identifier; never the phone number
    pub user_id: String,

    pub message_content: String,

    pub operator_id: String,
    pub operator_name: String,

    /// Set when the record is created, before the gateway is invoked
    pub queued_at: DateTime<Utc>,

    /// Set only on terminal success
    pub sent_at: Option<DateTime<Utc>>,

    pub status: MessageStatus,

    /// External message reference, set on success
    pub gateway_reference: Option<String>,

    /// Error detail, set on failure
    pub gateway_error: Option<String>,

    /// Partition flag, immutable after creation
    pub simulated: bool,
}

impl OutboundMessage {
    /// Create a new record in the initial `queued` state.
    pub fn new_queued(
        user_id: impl Into<String>,
        message_content: impl Into<String>,
        operator_id: impl Into<String>,
        operator_name: impl Into<String>,
        simulated: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            message_content: message_content.into(),
            operator_id: operator_id.into(),
            operator_name: operator_name.into(),
            queued_at: Utc::now(),
            sent_at: None,
            status: MessageStatus::Queued,
            gateway_reference: None,
            gateway_error: None,
            simulated,
        }
    }

    /// Whether the one-shot finalization has happened.
    pub fn is_final(&self) -> bool {
        self.status == MessageStatus::Failed
            || self.sent_at.is_some()
            || self.gateway_reference.is_some()
            || self.gateway_error.is_some()
    }
}

/// One received message. Immutable after creation; never contains the
/// sender's raw phone number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    pub id: String,

    pub timestamp: DateTime<Utc>,

    /// Registered user's identifier, or a correlation token for an
    /// unknown sender
    pub user_id: String,

    pub message_content: String,

    pub is_registered: bool,

    /// Whether an auto-acknowledgment was successfully dispatched
    pub response_sent: bool,

    pub gateway_reference: String,

    pub simulated: bool,
}

impl InboundMessage {
    pub fn new(
        user_id: impl Into<String>,
        message_content: impl Into<String>,
        is_registered: bool,
        response_sent: bool,
        gateway_reference: impl Into<String>,
        simulated: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            user_id: user_id.into(),
            message_content: message_content.into(),
            is_registered,
            response_sent,
            gateway_reference: gateway_reference.into(),
            simulated,
        }
    }
}

/// Sort direction for listings. Defaults to newest first.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Filters for outbound listings. Equality filters combine with AND.
#[derive(Debug, Clone, Default)]
pub struct OutboundQuery {
    pub limit: Option<usize>,
    pub sort: SortOrder,
    pub user_id: Option<String>,
    pub status: Option<MessageStatus>,
    pub operator_id: Option<String>,
}

/// Filters for inbound listings.
#[derive(Debug, Clone, Default)]
pub struct InboundQuery {
    pub limit: Option<usize>,
    pub sort: SortOrder,
    pub user_id: Option<String>,
    pub is_registered: Option<bool>,
}

/// Default row limit when a listing query does not supply one.
pub const DEFAULT_LIST_LIMIT: usize = 100;
