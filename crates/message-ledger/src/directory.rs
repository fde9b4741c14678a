//! Phone identity directory.
//!
//! Maps phone numbers to durable opaque user ids and back. The backing
//! collection is keyed by phone number; the id is a secondary field, so
//! the reverse lookup is an equality scan rather than a key fetch.

use crate::error::StoreError;
use crate::privacy::{is_valid_e164, normalize_phone_number};
use crate::store::DocumentStore;
use crate::types::{UserRecord, UserStatus};
use tracing::{info, instrument};

/// Directory over the `users` collection.
#[derive(Clone)]
pub struct Directory {
    store: DocumentStore,
}

impl Directory {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Look up a user by phone number (primary-key fetch).
    #[instrument(skip(self, phone_number))]
    pub async fn resolve_by_phone(
        &self,
        phone_number: &str,
    ) -> Result<Option<(String, UserRecord)>, StoreError> {
        let users = self.store.users.read().await;
        Ok(users
            .get(phone_number)
            .map(|r| (r.user_id.clone(), r.clone())))
    }

    /// Look up a user by opaque id (equality scan over the collection).
    #[instrument(skip(self))]
    pub async fn resolve_by_id(
        &self,
        user_id: &str,
    ) -> Result<Option<(String, UserRecord)>, StoreError> {
        let users = self.store.users.read().await;
        Ok(users
            .values()
            .find(|r| r.user_id == user_id)
            .map(|r| (r.phone_number.clone(), r.clone())))
    }

    /// Register a new subscriber.
    ///
    /// Accepts formatted input and stores the normalized E.164 form as the
    /// collection key. Assigns a fresh opaque id and enforces at write
    /// time that no id is ever shared by two phone numbers; the id→phone
    /// mapping must stay injective or bidirectional resolution breaks.
    #[instrument(skip(self, phone_number, name))]
    pub async fn register_user(
        &self,
        phone_number: &str,
        name: Option<String>,
    ) -> Result<UserRecord, StoreError> {
        let phone = normalize_phone_number(phone_number)
            .map_err(|_| StoreError::InvalidPhoneNumber(phone_number.into()))?;
        if !is_valid_e164(&phone) {
            return Err(StoreError::InvalidPhoneNumber(phone_number.into()));
        }

        let mut users = self.store.users.write().await;

        if users.contains_key(&phone) {
            return Err(StoreError::AlreadyRegistered);
        }

        let record = UserRecord::new(phone.clone(), name);

        if users.values().any(|r| r.user_id == record.user_id) {
            return Err(StoreError::DuplicateUserId(record.user_id));
        }

        users.insert(phone, record.clone());
        info!(user_id = %record.user_id, "Registered new subscriber");

        Ok(record)
    }

    /// Change a user's eligibility status.
    pub async fn set_status(
        &self,
        phone_number: &str,
        status: UserStatus,
    ) -> Result<UserRecord, StoreError> {
        let mut users = self.store.users.write().await;
        let record = users
            .get_mut(phone_number)
            .ok_or_else(|| StoreError::NotFound(phone_number.into()))?;
        record.status = status;
        Ok(record.clone())
    }

    /// List users, optionally filtered by status, sorted by name then
    /// phone number.
    pub async fn list_users(
        &self,
        status: Option<UserStatus>,
    ) -> Result<Vec<UserRecord>, StoreError> {
        let users = self.store.users.read().await;
        let mut records: Vec<UserRecord> = users
            .values()
            .filter(|r| status.map(|s| r.status == s).unwrap_or(true))
            .cloned()
            .collect();

        records.sort_by(|a, b| {
            let ka = (a.name.as_deref().unwrap_or(""), a.phone_number.as_str());
            let kb = (b.name.as_deref().unwrap_or(""), b.phone_number.as_str());
            ka.cmp(&kb)
        });

        Ok(records)
    }

    /// Number of registered users.
    pub async fn count(&self) -> usize {
        self.store.users.read().await.len()
    }
}
