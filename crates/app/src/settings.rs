//! Handles settings for the application. Configuration is written in
//! `settings.toml`; every key has a default so the file is optional.

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Path of the JSON document holding the active session.
    #[serde(default = "default_data_file")]
    pub data_file: String,
    /// Log level for the env filter.
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_data_file() -> String {
    String::from("patungan.json")
}

fn default_level() -> String {
    String::from("info")
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .build()?;

        settings.try_deserialize()
    }
}
