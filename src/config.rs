use crate::stats::{REFERENCE_FORMAT, default_reference};
use chrono::NaiveDateTime;
use std::{env, path::PathBuf};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub data_path: PathBuf,
    /// Day zero of every chart's x-axis.
    pub reference: NaiveDateTime,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, chrono::ParseError> {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8080);

        let reference = match env::var("POSTOP_REFERENCE") {
            Ok(value) => NaiveDateTime::parse_from_str(value.trim(), REFERENCE_FORMAT)?,
            Err(_) => default_reference(),
        };

        Ok(Self {
            port,
            data_path: crate::storage::resolve_data_path(),
            reference,
        })
    }
}
