// --- File: crates/services/bookotp_backend/src/service_factory.rs ---
//! Service factory implementation.
//!
//! Picks the notifier and slot table from the runtime flags and the compiled
//! features. With an integration switched off the factory falls back to the
//! logging notifier and the in-memory table; switching one on in a binary
//! built without its feature is a configuration error.

use bookotp_common::{
    config_error,
    services::{BoxedError, BoxedNotificationService, LoggingNotificationService, NotificationService},
    BookOtpError,
};
use bookotp_config::AppConfig;
use bookotp_sheets::{MemorySlotTable, SlotTable};
use std::sync::Arc;
use tracing::{info, warn};

#[cfg(feature = "twilio")]
use {bookotp_common::create_client, bookotp_twilio::TwilioNotificationService};

#[cfg(feature = "sheets")]
use {
    bookotp_common::store_error,
    bookotp_sheets::{auth::create_sheets_hub, GoogleSheetsTable},
};

pub struct BookOtpServiceFactory {
    notification_service: Arc<dyn NotificationService<Error = BoxedError>>,
    slot_table: Arc<dyn SlotTable>,
}

impl BookOtpServiceFactory {
    /// Create a new service factory.
    pub async fn new(config: &AppConfig) -> Result<Self, BookOtpError> {
        Ok(Self {
            notification_service: build_notifier(config)?,
            slot_table: build_slot_table(config).await?,
        })
    }

    /// Factory over explicit services, used when embedding the router.
    pub fn from_parts(
        notification_service: Arc<dyn NotificationService<Error = BoxedError>>,
        slot_table: Arc<dyn SlotTable>,
    ) -> Self {
        Self {
            notification_service,
            slot_table,
        }
    }

    pub fn notification_service(&self) -> Arc<dyn NotificationService<Error = BoxedError>> {
        self.notification_service.clone()
    }

    pub fn slot_table(&self) -> Arc<dyn SlotTable> {
        self.slot_table.clone()
    }
}

fn logging_notifier() -> Arc<dyn NotificationService<Error = BoxedError>> {
    warn!("Twilio disabled; messages (including codes) are written to the log");
    Arc::new(BoxedNotificationService::new(LoggingNotificationService::new()))
}

#[cfg(feature = "twilio")]
fn build_notifier(
    config: &AppConfig,
) -> Result<Arc<dyn NotificationService<Error = BoxedError>>, BookOtpError> {
    if !config.use_twilio {
        return Ok(logging_notifier());
    }
    let twilio = config
        .twilio
        .clone()
        .ok_or_else(|| config_error("use_twilio is set but [twilio] is missing"))?;
    let client = create_client(config.http.timeout_secs).map_err(config_error)?;

    info!(channel = ?twilio.channel, "Initializing Twilio notification service");
    Ok(Arc::new(BoxedNotificationService::new(
        TwilioNotificationService::new(client, twilio),
    )))
}

#[cfg(not(feature = "twilio"))]
fn build_notifier(
    config: &AppConfig,
) -> Result<Arc<dyn NotificationService<Error = BoxedError>>, BookOtpError> {
    if config.use_twilio {
        return Err(config_error(
            "use_twilio is set but this binary was built without the twilio feature",
        ));
    }
    Ok(logging_notifier())
}

async fn memory_table(config: &AppConfig) -> Result<Arc<dyn SlotTable>, BookOtpError> {
    let seed = config.sheets.as_ref().and_then(|s| s.seed_path.as_deref());
    let table = match seed {
        Some(path) => MemorySlotTable::from_seed_file(path)
            .await
            .map_err(config_error)?,
        None => {
            warn!("No seed_path configured; the in-memory slot table starts empty");
            MemorySlotTable::default()
        }
    };
    info!("Using in-memory slot table");
    Ok(Arc::new(table))
}

#[cfg(feature = "sheets")]
async fn build_slot_table(config: &AppConfig) -> Result<Arc<dyn SlotTable>, BookOtpError> {
    if !config.use_sheets {
        return memory_table(config).await;
    }
    let sheets = config
        .sheets
        .as_ref()
        .ok_or_else(|| config_error("use_sheets is set but [sheets] is missing"))?;

    info!(sheet = %sheets.sheet_name, "Initializing Google Sheets slot table");
    let hub = create_sheets_hub(sheets)
        .await
        .map_err(|e| store_error("google_sheets", e))?;
    Ok(Arc::new(GoogleSheetsTable::new(
        Arc::new(hub),
        &sheets.spreadsheet_id,
        &sheets.sheet_name,
    )))
}

#[cfg(not(feature = "sheets"))]
async fn build_slot_table(config: &AppConfig) -> Result<Arc<dyn SlotTable>, BookOtpError> {
    if config.use_sheets {
        return Err(config_error(
            "use_sheets is set but this binary was built without the sheets feature",
        ));
    }
    memory_table(config).await
}
