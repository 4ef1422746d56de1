// --- File: crates/bookotp_booking/src/routes.rs ---

use crate::handlers::{
    health_handler, list_slots_handler, send_otp_handler, verify_otp_handler, BookingState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing all booking routes.
///
/// Paths are relative; the backend mounts the router at the root and under
/// `/api`.
pub fn routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/send-otp", post(send_otp_handler))
        .route("/verify-otp", post(verify_otp_handler))
        .route("/slots", get(list_slots_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}
