// --- File: crates/bookotp_booking/src/handlers.rs ---

use axum::extract::{
    rejection::{JsonRejection, QueryRejection},
    Query, State,
};
use axum::Json;
use bookotp_common::{
    services::{BoxedError, NotificationService},
    validation_error, ApiEnvelope, BookOtpError,
};
use bookotp_config::AppConfig;
use bookotp_otp::OtpManager;
use bookotp_sheets::SlotRecorder;
use std::sync::Arc;

use crate::logic::{
    list_slots_logic, send_otp_logic, verify_otp_logic, HealthResponse, SendOtpRequest,
    SendOtpResponse, SlotsQuery, SlotsResponse, VerifyOtpRequest, VerifyOtpResponse,
};

// --- State for Booking Handlers ---
#[derive(Clone)]
pub struct BookingState {
    pub config: Arc<AppConfig>,
    pub otp: Arc<OtpManager>,
    pub recorder: Arc<SlotRecorder>,
    pub notifier: Arc<dyn NotificationService<Error = BoxedError>>,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, BookOtpError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| validation_error(rejection.body_text()))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/send-otp",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "Code issued and sent; body is {ok: true, data}", body = SendOtpResponse),
        (status = 400, description = "Missing or invalid phone, or partial booking fields"),
        (status = 500, description = "The code could not be delivered")
    ),
    tag = "Booking"
))]
pub async fn send_otp_handler(
    State(state): State<Arc<BookingState>>,
    payload: Result<Json<SendOtpRequest>, JsonRejection>,
) -> Result<ApiEnvelope<SendOtpResponse>, BookOtpError> {
    let request = json_body(payload)?;
    send_otp_logic(&state, request).await.map(ApiEnvelope::success)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/verify-otp",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Code accepted; booking recorded when one was attached", body = VerifyOtpResponse),
        (status = 400, description = "Missing fields or malformed code"),
        (status = 401, description = "invalid_code, unknown_phone or expired_code"),
        (status = 409, description = "No open slot matches the booking"),
        (status = 500, description = "Store update or confirmation delivery failed")
    ),
    tag = "Booking"
))]
pub async fn verify_otp_handler(
    State(state): State<Arc<BookingState>>,
    payload: Result<Json<VerifyOtpRequest>, JsonRejection>,
) -> Result<ApiEnvelope<VerifyOtpResponse>, BookOtpError> {
    let request = json_body(payload)?;
    verify_otp_logic(&state, request).await.map(ApiEnvelope::success)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/slots",
    params(SlotsQuery),
    responses(
        (status = 200, description = "Slots in the table", body = SlotsResponse),
        (status = 400, description = "Unsupported sort key"),
        (status = 500, description = "The slot table could not be read")
    ),
    tag = "Booking"
))]
pub async fn list_slots_handler(
    State(state): State<Arc<BookingState>>,
    query: Result<Query<SlotsQuery>, QueryRejection>,
) -> Result<ApiEnvelope<SlotsResponse>, BookOtpError> {
    let Query(query) = query.map_err(|rejection| validation_error(rejection.body_text()))?;
    list_slots_logic(&state, query).await.map(ApiEnvelope::success)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "Booking"
))]
pub async fn health_handler() -> ApiEnvelope<HealthResponse> {
    ApiEnvelope::success(HealthResponse {
        status: "ok".to_string(),
    })
}
