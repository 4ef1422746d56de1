use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The base error type for all bookotp errors.
///
/// Crate-specific errors convert into this enum at the HTTP boundary.
/// `Display` carries the full (possibly upstream) message and is meant for
/// logs; what a caller sees is [`BookOtpError::public_detail`].
#[derive(Error, Debug)]
pub enum BookOtpError {
    /// A request field is missing or malformed
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The submitted code does not match the live code
    #[error("Invalid verification code")]
    InvalidCode,

    /// No live code exists for the phone number
    #[error("No verification code pending for this phone number")]
    UnknownPhone,

    /// The live code outlived its TTL
    #[error("Verification code expired")]
    ExpiredCode,

    /// No open row matches the requested slot
    #[error("No open slot matches {0}")]
    NoMatchingSlot(String),

    /// The messaging provider rejected or failed the send
    #[error("Delivery error: {service_name} - {message}")]
    DeliveryError {
        service_name: String,
        message: String,
    },

    /// The booking was written but its confirmation message was not sent
    #[error("Confirmation not delivered: {service_name} - {message}")]
    ConfirmationNotDelivered {
        service_name: String,
        message: String,
    },

    /// The tabular store rejected a read or write
    #[error("Store error: {service_name} - {message}")]
    StoreError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Stable, machine-readable error classification used in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    InvalidCode,
    UnknownPhone,
    ExpiredCode,
    NoMatchingSlot,
    DeliveryFailed,
    StoreFailed,
    Config,
    Internal,
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for BookOtpError {
    fn status_code(&self) -> u16 {
        match self {
            BookOtpError::ValidationError(_) => 400,
            BookOtpError::InvalidCode => 401,
            BookOtpError::UnknownPhone => 401,
            BookOtpError::ExpiredCode => 401,
            BookOtpError::NoMatchingSlot(_) => 409,
            BookOtpError::DeliveryError { .. } => 500,
            BookOtpError::ConfirmationNotDelivered { .. } => 500,
            BookOtpError::StoreError { .. } => 500,
            BookOtpError::ConfigError(_) => 500,
            BookOtpError::InternalError(_) => 500,
        }
    }
}

impl BookOtpError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BookOtpError::ValidationError(_) => ErrorKind::Validation,
            BookOtpError::InvalidCode => ErrorKind::InvalidCode,
            BookOtpError::UnknownPhone => ErrorKind::UnknownPhone,
            BookOtpError::ExpiredCode => ErrorKind::ExpiredCode,
            BookOtpError::NoMatchingSlot(_) => ErrorKind::NoMatchingSlot,
            BookOtpError::DeliveryError { .. } | BookOtpError::ConfirmationNotDelivered { .. } => {
                ErrorKind::DeliveryFailed
            }
            BookOtpError::StoreError { .. } => ErrorKind::StoreFailed,
            BookOtpError::ConfigError(_) => ErrorKind::Config,
            BookOtpError::InternalError(_) => ErrorKind::Internal,
        }
    }

    /// Message safe to return to a client.
    ///
    /// Upstream and internal failures map to fixed text; the original
    /// message only goes to the log.
    pub fn public_detail(&self) -> String {
        match self {
            BookOtpError::ValidationError(msg) => msg.clone(),
            BookOtpError::NoMatchingSlot(slot) => format!("No open slot matches {slot}"),
            BookOtpError::InvalidCode | BookOtpError::UnknownPhone | BookOtpError::ExpiredCode => {
                self.to_string()
            }
            BookOtpError::DeliveryError { .. } => "Message delivery failed".to_string(),
            BookOtpError::ConfirmationNotDelivered { .. } => {
                "Booking recorded but confirmation could not be delivered".to_string()
            }
            BookOtpError::StoreError { .. } => "Booking store is unavailable".to_string(),
            BookOtpError::ConfigError(_) => "Server configuration error".to_string(),
            BookOtpError::InternalError(_) => "Internal server error".to_string(),
        }
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> BookOtpError {
    BookOtpError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> BookOtpError {
    BookOtpError::ValidationError(message.to_string())
}

pub fn delivery_error<T: fmt::Display>(service_name: &str, message: T) -> BookOtpError {
    BookOtpError::DeliveryError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn store_error<T: fmt::Display>(service_name: &str, message: T) -> BookOtpError {
    BookOtpError::StoreError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

