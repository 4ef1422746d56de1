use bookotp_common::BookOtpError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("Verification code does not match")]
    InvalidCode,
    #[error("No verification code pending for this phone number")]
    UnknownPhone,
    #[error("Verification code expired")]
    Expired,
}

impl From<OtpError> for BookOtpError {
    fn from(err: OtpError) -> Self {
        match err {
            OtpError::InvalidCode => BookOtpError::InvalidCode,
            OtpError::UnknownPhone => BookOtpError::UnknownPhone,
            OtpError::Expired => BookOtpError::ExpiredCode,
        }
    }
}
