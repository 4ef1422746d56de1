// File: crates/bookotp_sheets/src/auth.rs
use bookotp_config::SheetsConfig;
use google_sheets4::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator},
    Sheets,
};
use std::path::Path;

use crate::error::SheetsError;

// Type aliases for clarity
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = Sheets<Connector>;

pub async fn create_sheets_hub(config: &SheetsConfig) -> Result<HubType, SheetsError> {
    let key_path = config
        .key_path
        .as_deref()
        .ok_or_else(|| SheetsError::Auth("Missing key_path in SheetsConfig".to_string()))?;

    let sa_key = read_service_account_key(Path::new(key_path))
        .await
        .map_err(|e| SheetsError::Auth(format!("{key_path}: {e}")))?;

    let auth = ServiceAccountAuthenticator::builder(sa_key)
        .build()
        .await
        .map_err(|e| SheetsError::Auth(e.to_string()))?;

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()
        .map_err(|e| SheetsError::Auth(e.to_string()))?
        .https_or_http()
        .enable_http1()
        .build();

    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    Ok(Sheets::new(client, auth))
}
