// --- File: crates/services/bookotp_backend/src/app_state.rs ---
use bookotp_booking::BookingState;
use bookotp_config::AppConfig;
use bookotp_otp::OtpManager;
use bookotp_sheets::SlotRecorder;
use std::sync::Arc;

use crate::service_factory::BookOtpServiceFactory;

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub otp: Arc<OtpManager>,
    pub booking: Arc<BookingState>,
}

impl AppState {
    /// Wires the OTP manager, recorder and notifier from the factory.
    pub fn new(config: Arc<AppConfig>, factory: &BookOtpServiceFactory) -> Self {
        let otp = Arc::new(OtpManager::in_memory(config.otp.ttl_seconds));
        let recorder = Arc::new(SlotRecorder::new(factory.slot_table()));

        let booking = Arc::new(BookingState {
            config: config.clone(),
            otp: otp.clone(),
            recorder,
            notifier: factory.notification_service(),
        });

        Self {
            config,
            otp,
            booking,
        }
    }
}
