// --- File: crates/bookotp_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error taxonomy shared by every crate
pub mod http; // HTTP envelope and outbound client
pub mod logging; // Logging utilities
pub mod phone; // Phone normalisation and masking
pub mod services; // Service abstractions

// Re-export error types and utilities for easier access
pub use error::{
    config_error, delivery_error, store_error, validation_error, BookOtpError, ErrorKind,
    HttpStatusCode,
};

// Re-export HTTP utilities for easier access
pub use http::{client::create_client, ApiEnvelope};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level, parse_level};

// Re-export phone helpers for easier access
pub use phone::{is_valid_phone, mask_phone, normalize_phone};
