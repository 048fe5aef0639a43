// rest_api/src/config.rs

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8082;
pub const DEFAULT_DATA_FILE: &str = "patients.json";

/// Represents the configuration for the REST API server itself.
#[derive(Debug, Clone)]
pub struct RestApiConfig {
    pub host: String,
    pub port: u16,
}

/// Loads the REST API configuration from the environment
/// (`PATIENT_API_HOST`, `PATIENT_API_PORT`), falling back to defaults.
pub fn load_rest_api_config() -> Result<RestApiConfig> {
    let host = env::var("PATIENT_API_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = match env::var("PATIENT_API_PORT") {
        Ok(raw) => raw
            .parse::<u16>()
            .context("PATIENT_API_PORT must be a valid port number")?,
        Err(_) => DEFAULT_PORT,
    };
    Ok(RestApiConfig { host, port })
}

/// Location of the JSON document backing the patient store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub data_file: PathBuf,
}

/// Loads the store configuration from the environment
/// (`PATIENT_DATA_FILE`), falling back to `patients.json` in the working
/// directory.
pub fn load_store_config() -> Result<StoreConfig> {
    let data_file = env::var("PATIENT_DATA_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_FILE));
    Ok(StoreConfig { data_file })
}
