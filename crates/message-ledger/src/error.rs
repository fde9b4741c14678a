//! Directory and ledger errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Message already finalized: {0}")]
    AlreadyFinal(String),

    #[error("Phone number already registered")]
    AlreadyRegistered,

    #[error("User id already assigned to another phone number: {0}")]
    DuplicateUserId(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhoneNumber(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
