//! SMS gateway adapter: live transport client and simulated dispatcher.
//!
//! The live path talks to a Twilio-style REST API; the simulated path
//! synthesizes references and outcomes without any network traffic. Both
//! sit behind [`Gateway::dispatch`].

mod client;
mod dispatch;
mod error;
mod types;

pub use client::SmsClient;
pub use dispatch::Gateway;
pub use error::{GatewayError, SmsError};
pub use types::{DeliveredAs, DispatchReceipt, SimulatedOutcome};
