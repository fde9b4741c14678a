//! Live SMS transport HTTP client.

use crate::error::SmsError;
use crate::types::{SendSmsResponse, SmsApiError};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// HTTP client for a Twilio-style SMS REST API.
#[derive(Clone)]
pub struct SmsClient {
    client: Client,
    base_url: String,
    account_sid: String,
    auth_token: SecretString,
    from_number: String,
}

impl SmsClient {
    /// Create a new transport client.
    pub fn new(
        base_url: impl Into<String>,
        account_sid: impl Into<String>,
        auth_token: SecretString,
        from_number: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SmsError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            account_sid: account_sid.into(),
            auth_token,
            from_number: from_number.into(),
        })
    }

    /// Get the configured sender number.
    pub fn from_number(&self) -> &str {
        &self.from_number
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        )
    }

    /// Check if the transport API is reachable for this account.
    pub async fn health_check(&self) -> bool {
        self.client
            .get(format!(
                "{}/2010-04-01/Accounts/{}.json",
                self.base_url, self.account_sid
            ))
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// Send an SMS and return the provider message reference.
    #[instrument(skip(self, body))]
    pub async fn send(&self, to: &str, body: &str) -> Result<String, SmsError> {
        let params = [("To", to), ("From", &self.from_number), ("Body", body)];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let api_message = response
                .json::<SmsApiError>()
                .await
                .ok()
                .and_then(|e| e.message);
            return match api_message {
                Some(msg) => {
                    warn!("Send rejected by API: {}", msg);
                    Err(SmsError::Api(msg))
                }
                None => {
                    warn!("Send failed without an error body");
                    Err(SmsError::SendFailed("transport rejected the request".into()))
                }
            };
        }

        let parsed: SendSmsResponse = response.json().await?;
        debug!("Sent message, reference {}", parsed.sid);
        Ok(parsed.sid)
    }
}
