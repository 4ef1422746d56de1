// --- File: crates/bookotp_booking/src/doc.rs ---

// Only compile this module if the 'openapi' feature is enabled
#![cfg(feature = "openapi")]

use bookotp_common::{services::BookingDetails, ErrorKind};
use utoipa::OpenApi;

use crate::logic::{
    HealthResponse, SendOtpRequest, SendOtpResponse, SlotView, SlotsResponse, VerifyOtpRequest,
    VerifyOtpResponse,
};

// --- Main OpenAPI Definition for the Booking Service ---
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::send_otp_handler,
        crate::handlers::verify_otp_handler,
        crate::handlers::list_slots_handler,
        crate::handlers::health_handler
    ),
    components(
        schemas(
            SendOtpRequest,
            SendOtpResponse,
            VerifyOtpRequest,
            VerifyOtpResponse,
            BookingDetails,
            SlotView,
            SlotsResponse,
            HealthResponse,
            ErrorKind
        )
    ),
    tags(
        (name = "Booking", description = "OTP-confirmed slot booking")
    )
)]
pub struct BookingApiDoc;
