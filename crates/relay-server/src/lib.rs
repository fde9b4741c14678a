//! SMS relay gateway server.
//!
//! Operators send and receive SMS through a gateway while subscriber
//! phone numbers stay server-side: message records carry opaque user ids
//! or one-way correlation tokens, and every operator-facing render of a
//! phone number is masked. A process-wide simulated gateway mode keeps
//! test traffic strictly partitioned from live traffic.

pub mod api;
pub mod config;
pub mod error;
pub mod relay;

pub use config::Config;
pub use error::RelayError;
