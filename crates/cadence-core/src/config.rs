use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// IANA zone used when a schedule definition does not name one.
    pub default_timezone: String,

    /// Upper bound on catch-up iterations when fast-forwarding a schedule to a
    /// reference instant.
    pub max_catchup_steps: u32,
}

impl EngineConfig {
    /// ## Summary
    /// Checks the engine configuration for values the evaluator cannot work with.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` if `max_catchup_steps` is zero
    /// or `default_timezone` is empty.
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_catchup_steps == 0 {
            return Err(CoreError::InvalidConfiguration(
                "engine.max_catchup_steps must be at least 1".to_string(),
            ));
        }
        if self.default_timezone.is_empty() {
            return Err(CoreError::InvalidConfiguration(
                "engine.default_timezone must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into a `Settings`.
    /// Environment variables take precedence over `.env` file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("engine.default_timezone", "UTC")?
            .set_default("engine.max_catchup_steps", 10_000)?
            .set_default("logging.level", "debug")?
            // Env file
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
