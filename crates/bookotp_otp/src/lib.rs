// --- File: crates/bookotp_otp/src/lib.rs ---

pub mod error;
pub mod manager;
#[cfg(test)]
mod manager_proptest;
pub mod store;

pub use error::OtpError;
pub use manager::{IssuedCode, OtpManager, CODE_LENGTH};
pub use store::{Decision, InMemoryOtpStore, OtpRecord, OtpStore};
