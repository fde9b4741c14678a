//! API request and response types.

use chrono::{DateTime, Utc};
use message_ledger::{
    InboundMessage, MessageStatus, OutboundMessage, SortOrder, UserRecord, UserStatus,
};
use serde::{Deserialize, Serialize};
use sms_gateway::SimulatedOutcome;

/// Request to send an SMS to a registered user.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    /// Opaque user identifier of the recipient
    pub user_id: String,

    pub message_content: String,

    pub operator_id: String,

    /// Display name of the initiating operator
    #[serde(default = "default_operator_name")]
    pub operator_name: String,

    /// Desired outcome hint, honored only in simulated mode
    pub simulate_status: Option<SimulatedOutcome>,
}

fn default_operator_name() -> String {
    "Operator".into()
}

/// Response after a successful send.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub status: MessageStatus,
    pub message_id: String,
    pub user_id: String,
    pub masked_phone: String,
    pub timestamp: DateTime<Utc>,
    pub gateway_reference: String,
}

/// Query parameters for outbound listings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundListParams {
    pub limit: Option<usize>,
    #[serde(default)]
    pub sort: SortOrder,
    pub user_id: Option<String>,
    pub status: Option<MessageStatus>,
    pub operator_id: Option<String>,
}

/// Query parameters for inbound listings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundListParams {
    pub limit: Option<usize>,
    #[serde(default)]
    pub sort: SortOrder,
    pub user_id: Option<String>,
    pub is_registered: Option<bool>,
}

/// Outbound listing envelope.
#[derive(Debug, Serialize)]
pub struct OutboundListResponse {
    pub status: String,
    pub count: usize,
    pub simulated: bool,
    pub messages: Vec<OutboundMessage>,
}

/// Inbound listing envelope.
#[derive(Debug, Serialize)]
pub struct InboundListResponse {
    pub status: String,
    pub count: usize,
    pub simulated: bool,
    pub messages: Vec<InboundMessage>,
}

/// Request to register a new subscriber.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub phone_number: String,
    pub name: Option<String>,
}

/// Query parameters for the user listing.
#[derive(Debug, Default, Deserialize)]
pub struct UserListParams {
    pub status: Option<UserStatus>,
}

/// Operator-facing view of a subscriber. The phone number only ever
/// leaves the server in masked form.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub user_id: String,
    pub masked_phone: String,
    pub name: Option<String>,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for UserView {
    fn from(record: UserRecord) -> Self {
        Self {
            masked_phone: message_ledger::privacy::masked_display(&record.phone_number),
            user_id: record.user_id,
            name: record.name,
            status: record.status,
            created_at: record.created_at,
        }
    }
}

/// User listing envelope.
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub status: String,
    pub count: usize,
    pub users: Vec<UserView>,
}

/// Inbound webhook form posted by the SMS transport.
///
/// Every field defaults: a malformed webhook must still decode so the
/// transport gets its 200 and does not retry.
#[derive(Debug, Deserialize)]
pub struct InboundWebhook {
    #[serde(rename = "From", default)]
    pub from: String,
    #[serde(rename = "Body", default)]
    pub body: String,
    #[serde(rename = "MessageSid", default)]
    pub message_sid: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub simulated: bool,
    pub store: String,
    pub user_count: usize,
}
