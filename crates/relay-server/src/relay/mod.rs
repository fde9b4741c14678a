//! Message relay orchestration: the inbound and outbound handlers.

mod inbound;
mod outbound;

pub use inbound::InboundRelay;
pub use outbound::{OutboundReceipt, OutboundRelay, OutboundRequest};
