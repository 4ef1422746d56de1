// --- File: crates/bookotp_common/src/services.rs ---
//! Service abstractions for external collaborators.
//!
//! The booking flow only talks to message delivery through
//! [`NotificationService`], so handlers can be exercised against a recording
//! fake and the backend can swap Twilio for a logging stand-in.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

use crate::phone::mask_phone;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// A trait for outbound message delivery (SMS, WhatsApp, ...).
pub trait NotificationService: Send + Sync {
    /// Error type returned by notification service operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Deliver `body` to the phone number `to` (E.164).
    fn send_message(&self, to: &str, body: &str) -> BoxFuture<'_, NotificationResult, Self::Error>;

    /// Short provider name used in logs and error classification.
    fn name(&self) -> &'static str;
}

/// Represents the result of a notification operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    /// Provider message id.
    pub id: String,
    /// Provider status, e.g. `queued`.
    pub status: String,
}

/// The slot a customer asked for, bound to an OTP at issue time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    pub name: String,
    pub service: String,
    #[serde(default)]
    pub service_type: String,
    pub date: String,
    pub time: String,
}

impl fmt::Display for BookingDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.service_type.is_empty() {
            write!(f, "{} on {} at {}", self.service, self.date, self.time)
        } else {
            write!(
                f,
                "{} ({}) on {} at {}",
                self.service, self.service_type, self.date, self.time
            )
        }
    }
}

/// Erases the concrete error type of a notifier so it fits
/// `Arc<dyn NotificationService<Error = BoxedError>>`.
pub struct BoxedNotificationService<S> {
    inner: S,
}

impl<S> BoxedNotificationService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S> NotificationService for BoxedNotificationService<S>
where
    S: NotificationService,
{
    type Error = BoxedError;

    fn send_message(&self, to: &str, body: &str) -> BoxFuture<'_, NotificationResult, Self::Error> {
        let to = to.to_string();
        let body = body.to_string();
        let inner = &self.inner;

        Box::pin(async move {
            inner
                .send_message(&to, &body)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

/// Writes messages to the log instead of delivering them.
///
/// Used when the Twilio integration is disabled, so the whole flow can be
/// driven locally. The message body is logged at INFO, which includes OTP
/// codes: never enable this in production.
#[derive(Debug, Default)]
pub struct LoggingNotificationService {
    sent: AtomicU64,
}

impl LoggingNotificationService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotificationService for LoggingNotificationService {
    type Error = Infallible;

    fn send_message(&self, to: &str, body: &str) -> BoxFuture<'_, NotificationResult, Self::Error> {
        let seq = self.sent.fetch_add(1, Ordering::Relaxed) + 1;
        let to = mask_phone(to);
        let body = body.to_string();

        Box::pin(async move {
            info!(event = "message_logged", to = %to, seq, "{}", body);
            Ok(NotificationResult {
                id: format!("log-{seq}"),
                status: "logged".to_string(),
            })
        })
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
