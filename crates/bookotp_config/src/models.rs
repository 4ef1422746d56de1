// --- File: crates/bookotp_config/src/models.rs ---

use serde::{Deserialize, Serialize};

/// Marker value in config files for fields injected from the environment.
pub const SECRET_FROM_ENV: &str = "secret_from_env";

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpClientConfig {
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout(),
        }
    }
}

// --- OTP Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OtpConfig {
    /// Lifetime of an issued code.
    #[serde(default = "default_otp_ttl")]
    pub ttl_seconds: u64,
    /// How often the backend sweeps expired codes out of the store.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_otp_ttl(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct PhoneConfig {
    /// Digits only, e.g. "966". Replaces a leading 0 of local numbers.
    pub default_country_code: Option<String>,
}

// --- Message Templates ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MessagesConfig {
    /// Placeholder: {code}
    #[serde(default = "default_otp_template")]
    pub otp_template: String,
    /// Placeholders: {name} {service} {service_type} {date} {time}
    #[serde(default = "default_confirmation_template")]
    pub confirmation_template: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            otp_template: default_otp_template(),
            confirmation_template: default_confirmation_template(),
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TwilioChannel {
    #[default]
    Sms,
    Whatsapp,
}

// --- Twilio Config ---
// account_sid and auth_token are usually "secret_from_env" in the config files.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TwilioConfig {
    pub account_sid: String, // BOOKOTP_SECRET_TWILIO_ACCOUNT_SID or TWILIO_ACCOUNT_SID
    pub auth_token: String,  // BOOKOTP_SECRET_TWILIO_AUTH_TOKEN or TWILIO_AUTH_TOKEN
    pub from_number: String,
    #[serde(default)]
    pub channel: TwilioChannel,
    #[serde(default = "default_twilio_base_url")]
    pub api_base_url: String,
}

// --- Google Sheets Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SheetsConfig {
    /// Path to the service account JSON key.
    pub key_path: Option<String>,
    pub spreadsheet_id: String,
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
    /// JSON rows loaded into the in-memory table when `use_sheets` is off.
    pub seed_path: Option<String>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_twilio: bool,
    #[serde(default)]
    pub use_sheets: bool,

    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub http: HttpClientConfig,
    #[serde(default)]
    pub otp: OtpConfig,
    #[serde(default)]
    pub phone: PhoneConfig,
    #[serde(default)]
    pub messages: MessagesConfig,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub twilio: Option<TwilioConfig>,
    #[serde(default)]
    pub sheets: Option<SheetsConfig>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_http_timeout() -> u64 {
    30
}

fn default_otp_ttl() -> u64 {
    300
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_otp_template() -> String {
    "Your verification code is {code}".to_string()
}

fn default_confirmation_template() -> String {
    "Hello {name}, your {service} appointment on {date} at {time} is confirmed.".to_string()
}

fn default_twilio_base_url() -> String {
    "https://api.twilio.com".to_string()
}

fn default_sheet_name() -> String {
    "Sheet1".to_string()
}
