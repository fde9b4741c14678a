//! Identity directory, privacy codec, and message ledger.
//!
//! Phone numbers live only in the `users` collection; every message
//! record carries an opaque user id or a one-way correlation token.
//! Live and simulated message data are strictly partitioned.

mod directory;
mod error;
mod ledger;
pub mod privacy;
mod store;
mod types;

pub use directory::Directory;
pub use error::StoreError;
pub use ledger::{Ledger, Outcome};
pub use store::DocumentStore;
pub use types::*;
