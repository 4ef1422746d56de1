/// This module provides the Twilio notification service implementation.
pub mod service;

pub use service::{TwilioError, TwilioNotificationService};
