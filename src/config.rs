//! Application configuration
//!
//! Values are layered: built-in defaults, then an optional config file
//! (`config/disburse.{toml,yaml,json}` or the `--config` path), then
//! `DISBURSE_*` environment variables. Command-line overrides are applied on
//! top by the `cli` module.

use crate::types::{Credentials, DisburseError};
use config::{Config, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "DISBURSE";
const DEFAULT_CONFIG_FILE: &str = "config/disburse";

#[derive(Deserialize)]
pub struct AppConfig {
    /// Suggested answer to the list-file prompt
    pub default_input_path: PathBuf,
    /// Directory receiving the `log_<timestamp>` session logs
    pub output_dir: PathBuf,
    pub rpc_url: String,
    /// Hex-encoded private key of the sending account
    pub private_key: String,
    /// Largest acceptable fee for a single transfer, in ether
    pub fee_ceiling: Decimal,
    pub native_asset: String,
    pub confirmations: usize,
    pub confirmation_timeout_secs: Option<u64>,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("default_input_path", &self.default_input_path)
            .field("output_dir", &self.output_dir)
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &"<redacted>")
            .field("fee_ceiling", &self.fee_ceiling)
            .field("native_asset", &self.native_asset)
            .field("confirmations", &self.confirmations)
            .field("confirmation_timeout_secs", &self.confirmation_timeout_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl AppConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.private_key.clone())
    }

    pub fn confirmation_timeout(&self) -> Option<Duration> {
        self.confirmation_timeout_secs.map(Duration::from_secs)
    }

    /// Reject values that would make a session meaningless
    pub fn validate(&self) -> Result<(), DisburseError> {
        if self.private_key.trim().is_empty() {
            return Err(DisburseError::config("private_key is required"));
        }
        if self.fee_ceiling.is_sign_negative() {
            return Err(DisburseError::config(format!(
                "fee_ceiling must not be negative, got {}",
                self.fee_ceiling
            )));
        }
        if self.native_asset.trim().is_empty() {
            return Err(DisburseError::config("native_asset must not be empty"));
        }
        Ok(())
    }
}

/// Load configuration from the default locations
///
/// `path` replaces the default config file and must exist when given.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, DisburseError> {
    load_config_with(path, Environment::with_prefix(ENV_PREFIX))
}

/// Load configuration with an explicit environment source
pub fn load_config_with(
    path: Option<&Path>,
    environment: Environment,
) -> Result<AppConfig, DisburseError> {
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let settings = Config::builder()
        // Set defaults
        .set_default("default_input_path", "input/list.tsv")?
        .set_default("output_dir", "output")?
        .set_default("rpc_url", "http://localhost:8545")?
        .set_default("private_key", "")?
        .set_default("fee_ceiling", "0.01")?
        .set_default("native_asset", "ETH")?
        .set_default("confirmations", 1)?
        .set_default("log_level", "info")?
        .add_source(file)
        .add_source(environment)
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
