// --- File: crates/bookotp_booking/src/logic.rs ---
//! The booking flow behind the HTTP handlers.
//!
//! `send-otp` issues a code and delivers it; `verify-otp` consumes the code
//! and, when a slot is attached, records the booking and sends the
//! confirmation. The store is always written before the confirmation goes
//! out.

use bookotp_common::{
    delivery_error, is_valid_phone, mask_phone, normalize_phone,
    services::BookingDetails,
    validation_error, BookOtpError,
};
use bookotp_otp::CODE_LENGTH;
use bookotp_sheets::SlotRow;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::handlers::BookingState;

// --- Request / response types ---

#[derive(Deserialize, Debug, Default, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
    pub phone: Option<String>,
    pub name: Option<String>,
    pub service: Option<String>,
    pub service_type: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SendOtpResponse {
    pub message: String,
    pub expires_in_seconds: u64,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub phone: Option<String>,
    pub otp: Option<String>,
    pub name: Option<String>,
    pub service: Option<String>,
    pub service_type: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct VerifyOtpResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<BookingDetails>,
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct SlotsQuery {
    /// Only `date` is supported.
    pub sort: Option<String>,
    pub open_only: Option<bool>,
}

/// A slot as listed to clients. Customer name and phone are not exposed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    pub row: usize,
    pub service: String,
    pub service_type: String,
    pub date: String,
    pub time: String,
    pub booked: bool,
}

impl From<SlotRow> for SlotView {
    fn from(row: SlotRow) -> Self {
        Self {
            booked: !row.is_open(),
            row: row.row_number,
            service: row.service,
            service_type: row.service_type,
            date: row.date,
            time: row.time,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SlotsResponse {
    pub slots: Vec<SlotView>,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status: String,
}

// --- Validation helpers ---

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Normalises and validates a phone field.
pub fn parse_phone(
    raw: &Option<String>,
    default_country_code: Option<&str>,
) -> Result<String, BookOtpError> {
    let raw = present(raw).ok_or_else(|| validation_error("phone is required"))?;
    let phone = normalize_phone(&raw, default_country_code);
    if !is_valid_phone(&phone) {
        return Err(validation_error("phone must be a valid international number"));
    }
    Ok(phone)
}

/// Booking details from request fields.
///
/// `service`, `date` and `time` must be given together or not at all.
/// `serviceType` and `name` are optional and default to empty.
pub fn booking_from_fields(
    name: &Option<String>,
    service: &Option<String>,
    service_type: &Option<String>,
    date: &Option<String>,
    time: &Option<String>,
) -> Result<Option<BookingDetails>, BookOtpError> {
    match (present(service), present(date), present(time)) {
        (Some(service), Some(date), Some(time)) => Ok(Some(BookingDetails {
            name: present(name).unwrap_or_default(),
            service,
            service_type: present(service_type).unwrap_or_default(),
            date,
            time,
        })),
        (None, None, None) => Ok(None),
        _ => Err(validation_error(
            "service, date and time must be provided together",
        )),
    }
}

/// Checks that the submitted code is exactly six digits.
pub fn parse_code(raw: &Option<String>) -> Result<String, BookOtpError> {
    let code = present(raw).ok_or_else(|| validation_error("otp is required"))?;
    if code.len() != CODE_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(validation_error("otp must be a 6-digit code"));
    }
    Ok(code)
}

// --- Templates ---

/// Replaces each `{key}` in `template` with its value.
pub fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |acc, (key, value)| {
            acc.replace(&format!("{{{key}}}"), value)
        })
}

pub fn otp_message(template: &str, code: &str) -> String {
    render_template(template, &[("code", code)])
}

pub fn confirmation_message(template: &str, booking: &BookingDetails) -> String {
    render_template(
        template,
        &[
            ("name", &booking.name),
            ("service_type", &booking.service_type),
            ("service", &booking.service),
            ("date", &booking.date),
            ("time", &booking.time),
        ],
    )
}

// --- Flow ---

pub async fn send_otp_logic(
    state: &BookingState,
    request: SendOtpRequest,
) -> Result<SendOtpResponse, BookOtpError> {
    let cc = state.config.phone.default_country_code.as_deref();
    let phone = parse_phone(&request.phone, cc)?;
    let booking = booking_from_fields(
        &request.name,
        &request.service,
        &request.service_type,
        &request.date,
        &request.time,
    )?;

    let issued = state.otp.issue(&phone, booking);
    let body = otp_message(&state.config.messages.otp_template, &issued.code);

    if let Err(e) = state.notifier.send_message(&phone, &body).await {
        state.otp.discard_code(&phone, &issued.code);
        return Err(delivery_error(state.notifier.name(), e));
    }

    info!(event = "otp_sent", phone = %mask_phone(&phone), "Verification code sent");
    Ok(SendOtpResponse {
        message: "Verification code sent".to_string(),
        expires_in_seconds: state.config.otp.ttl_seconds,
    })
}

pub async fn verify_otp_logic(
    state: &BookingState,
    request: VerifyOtpRequest,
) -> Result<VerifyOtpResponse, BookOtpError> {
    let cc = state.config.phone.default_country_code.as_deref();
    let phone = parse_phone(&request.phone, cc)?;
    let code = parse_code(&request.otp)?;
    let requested = booking_from_fields(
        &request.name,
        &request.service,
        &request.service_type,
        &request.date,
        &request.time,
    )?;

    let bound = state.otp.verify(&phone, &code)?;

    match bound.or(requested) {
        None => Ok(VerifyOtpResponse {
            message: "Phone number verified".to_string(),
            booking: None,
        }),
        Some(booking) => {
            confirm_booking(state, &phone, &booking).await?;
            Ok(VerifyOtpResponse {
                message: "Booking confirmed".to_string(),
                booking: Some(booking),
            })
        }
    }
}

/// Records the booking, then sends the confirmation.
///
/// A failed send after a successful write is reported as
/// [`BookOtpError::ConfirmationNotDelivered`]; the row stays booked.
pub async fn confirm_booking(
    state: &BookingState,
    phone: &str,
    booking: &BookingDetails,
) -> Result<(), BookOtpError> {
    state
        .recorder
        .record_booking(booking, phone)
        .await
        .map_err(|e| e.into_book_otp(state.recorder.table_name()))?;

    let body = confirmation_message(&state.config.messages.confirmation_template, booking);
    if let Err(e) = state.notifier.send_message(phone, &body).await {
        error!(
            event = "confirmation_failed",
            phone = %mask_phone(phone),
            slot = %booking,
            "Booking recorded but confirmation failed: {}",
            e
        );
        return Err(BookOtpError::ConfirmationNotDelivered {
            service_name: state.notifier.name().to_string(),
            message: e.to_string(),
        });
    }
    Ok(())
}

pub async fn list_slots_logic(
    state: &BookingState,
    query: SlotsQuery,
) -> Result<SlotsResponse, BookOtpError> {
    let sort = match query.sort.as_deref().map(str::trim) {
        None | Some("") => false,
        Some(s) if s.eq_ignore_ascii_case("date") => true,
        Some(other) => return Err(validation_error(format!("unsupported sort key: {other}"))),
    };
    let rows = state
        .recorder
        .list_slots(sort, query.open_only.unwrap_or(false))
        .await
        .map_err(|e| e.into_book_otp(state.recorder.table_name()))?;

    Ok(SlotsResponse {
        slots: rows.into_iter().map(SlotView::from).collect(),
    })
}
