use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use log::info;
use serde::Deserialize;

use crate::env::get_env_var;

pub const DEFAULT_AUTH_API_URL: &str = "http://localhost:5000/api/";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MAX_RETRIES: u32 = 3;

const DEFAULT_CONFIG_FILE: &str = "prepmate";

/// Application settings.
///
/// Sources, lowest priority first: built-in defaults (which already include
/// any build-time embedded values), `prepmate.toml` (or the file passed on
/// the command line), then `PREPMATE_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub auth_api_url: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub max_retries: u32,
    pub data_dir: PathBuf,
}

impl Settings {
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let auth_api_url =
            get_env_var("PREPMATE_AUTH_API_URL").unwrap_or_else(|| DEFAULT_AUTH_API_URL.to_string());
        let gemini_model =
            get_env_var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        let mut builder = Config::builder()
            .set_default("auth_api_url", auth_api_url)?
            .set_default("gemini_model", gemini_model)?
            .set_default("gemini_base_url", DEFAULT_GEMINI_BASE_URL)?
            .set_default("max_retries", i64::from(DEFAULT_MAX_RETRIES))?
            .set_default("data_dir", default_data_dir().to_string_lossy().to_string())?;

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let settings: Settings = builder
            .add_source(Environment::with_prefix("PREPMATE"))
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Invalid configuration values")?;

        info!(
            "🔧 Settings loaded: auth={}, model={}, retries={}, data_dir={}",
            settings.auth_api_url,
            settings.gemini_model,
            settings.max_retries,
            settings.data_dir.display()
        );

        Ok(settings)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".prepmate")
}
