use bookotp_common::{store_error, BookOtpError};
use std::io;
use thiserror::Error;

/// Errors raised by a [`crate::SlotTable`] backend.
#[derive(Error, Debug)]
pub enum SheetsError {
    #[cfg(feature = "google")]
    #[error("Google API Error: {0}")]
    ApiError(#[from] google_sheets4::Error),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Failed to read seed file {path}: {source}")]
    SeedIo { path: String, source: io::Error },
    #[error("Failed to parse seed file {path}: {source}")]
    SeedFormat {
        path: String,
        source: serde_json::Error,
    },
    #[error("Row {0} is outside the table")]
    RowOutOfRange(usize),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum RecorderError {
    #[error("No open slot matches {0}")]
    NoMatchingSlot(String),
    #[error(transparent)]
    Store(#[from] SheetsError),
}

impl RecorderError {
    pub fn into_book_otp(self, table_name: &str) -> BookOtpError {
        match self {
            RecorderError::NoMatchingSlot(slot) => BookOtpError::NoMatchingSlot(slot),
            RecorderError::Store(err) => store_error(table_name, err),
        }
    }
}
