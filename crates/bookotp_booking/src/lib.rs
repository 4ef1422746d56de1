// --- File: crates/bookotp_booking/src/lib.rs ---

// Declare modules within this crate
pub mod handlers; // Axum handlers for the booking endpoints
pub mod logic; // Request types and the send/verify/confirm flow
pub mod routes; // Axum router definition for this crate
#[cfg(feature = "openapi")]
pub mod doc;

// Re-export the routes function to be used by the main backend service
pub use routes::routes;

// Re-export state so the backend can construct it
pub use handlers::BookingState;
