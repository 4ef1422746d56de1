// --- File: crates/bookotp_twilio/src/service.rs ---
use bookotp_common::{
    mask_phone,
    services::{BoxFuture, NotificationResult, NotificationService},
};
use bookotp_config::{TwilioChannel, TwilioConfig};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

/// Twilio-specific error types.
#[derive(Error, Debug)]
pub enum TwilioError {
    /// Error occurred during a Twilio API request
    #[error("Twilio API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the Twilio API
    #[error("Twilio API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// The API answered 2xx with a body we could not read
    #[error("Unexpected Twilio response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

/// Sends messages through the Twilio Messages API.
pub struct TwilioNotificationService {
    client: Client,
    config: TwilioConfig,
}

impl TwilioNotificationService {
    pub fn new(client: Client, config: TwilioConfig) -> Self {
        Self { client, config }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.account_sid
        )
    }

    /// `To`/`From` as Twilio expects them for the configured channel.
    pub(crate) fn address(&self, number: &str) -> String {
        match self.config.channel {
            TwilioChannel::Sms => number.to_string(),
            TwilioChannel::Whatsapp if number.starts_with("whatsapp:") => number.to_string(),
            TwilioChannel::Whatsapp => format!("whatsapp:{number}"),
        }
    }
}

impl NotificationService for TwilioNotificationService {
    type Error = TwilioError;

    fn send_message(&self, to: &str, body: &str) -> BoxFuture<'_, NotificationResult, Self::Error> {
        let url = self.messages_url();
        let to_address = self.address(to);
        let from_address = self.address(&self.config.from_number);
        let body = body.to_string();
        let masked = mask_phone(to);

        Box::pin(async move {
            let params = [
                ("To", to_address.as_str()),
                ("From", from_address.as_str()),
                ("Body", body.as_str()),
            ];
            let resp = self
                .client
                .post(&url)
                .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
                .form(&params)
                .send()
                .await?;

            let status = resp.status();
            let text = resp.text().await?;

            if !status.is_success() {
                let message = serde_json::from_str::<ApiErrorBody>(&text)
                    .ok()
                    .map(|e| match (e.code, e.message) {
                        (Some(code), Some(msg)) => format!("{code}: {msg}"),
                        (None, Some(msg)) => msg,
                        (Some(code), None) => code.to_string(),
                        (None, None) => text.clone(),
                    })
                    .unwrap_or(text);
                error!(to = %masked, status = status.as_u16(), "Twilio rejected message: {}", message);
                return Err(TwilioError::ApiError {
                    status_code: status.as_u16(),
                    message,
                });
            }

            let resource: MessageResource = serde_json::from_str(&text)
                .map_err(|e| TwilioError::InvalidResponse(e.to_string()))?;
            info!(to = %masked, sid = %resource.sid, "Message accepted by Twilio");

            Ok(NotificationResult {
                id: resource.sid,
                status: resource.status.unwrap_or_else(|| "queued".to_string()),
            })
        })
    }

    fn name(&self) -> &'static str {
        "twilio"
    }
}
