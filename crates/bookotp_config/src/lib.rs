use config::{Config, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

pub mod env_vars;
pub mod models;
#[cfg(test)]
mod models_test;

pub use models::*;

/// Errors raised while loading or validating the configuration.
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("failed to read configuration: {0}")]
    Source(#[from] config::ConfigError),

    #[error("failed to map configuration: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Loads the configuration once at startup.
///
/// Layers, lowest precedence first: `config/default`, `config/{RUN_ENV}`,
/// then `BOOKOTP__SECTION__KEY` environment variables. The layers are
/// deserialized straight into [`AppConfig`], so `BOOKOTP__PHONE__DEFAULT_COUNTRY_CODE=966`
/// stays a string. Afterwards every `"secret_from_env"` marker is replaced
/// from the environment and the result is validated.
pub fn load_config() -> Result<AppConfig, ConfigLoadError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env_vars::get_config_prefix();
    let config_dir = PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string()));

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(Environment::with_prefix(&prefix).separator(env_vars::CONFIG_SEPARATOR));

    let typed: AppConfig = builder.build()?.try_deserialize()?;
    let config = inject_secrets(typed)?;
    config.validate()?;
    Ok(config)
}

impl AppConfig {
    /// Checks that every enabled integration has a usable section.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let mut problems = Vec::new();

        if self.otp.ttl_seconds == 0 {
            problems.push("otp.ttl_seconds must be greater than zero".to_string());
        }
        if !self.messages.otp_template.contains("{code}") {
            problems.push("messages.otp_template must contain {code}".to_string());
        }

        if self.use_twilio {
            match &self.twilio {
                None => problems.push("use_twilio is set but [twilio] is missing".to_string()),
                Some(twilio) => {
                    for (field, value) in [
                        ("twilio.account_sid", &twilio.account_sid),
                        ("twilio.auth_token", &twilio.auth_token),
                        ("twilio.from_number", &twilio.from_number),
                    ] {
                        if is_unset(value) {
                            problems.push(format!("{field} is empty or not injected"));
                        }
                    }
                }
            }
        }

        if self.use_sheets {
            match &self.sheets {
                None => problems.push("use_sheets is set but [sheets] is missing".to_string()),
                Some(sheets) => {
                    if sheets.key_path.as_deref().map_or(true, is_unset) {
                        problems.push("sheets.key_path is required".to_string());
                    }
                    if is_unset(&sheets.spreadsheet_id) {
                        problems.push("sheets.spreadsheet_id is empty or not injected".to_string());
                    }
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigLoadError::Invalid(problems))
        }
    }
}

fn is_unset(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == SECRET_FROM_ENV
}

/// Replaces `"secret_from_env"` markers in an already typed config.
pub fn inject_secrets(config: AppConfig) -> Result<AppConfig, ConfigLoadError> {
    let mut raw = serde_json::to_value(&config)?;
    for path in env_vars::inject_env_vars(&mut raw) {
        warn!(path = %path, "secret_from_env marker without matching environment variable");
    }
    Ok(serde_json::from_value::<AppConfig>(raw)?)
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// Uses `DOTENV_OVERRIDE` when set, otherwise the first command line
/// argument if it looks like `.env*`, otherwise `.env`. Returns the path
/// that was tried.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = std::env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
