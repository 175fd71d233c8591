//! Application configuration module.
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the `WAYFARER`
//! prefix and `__` (double underscore) separating nested sections, e.g.
//! `WAYFARER__ENGINE__SERVICE_FEE_PERCENT=7`.
//!
//! Every field has a sensible default, so `AppConfig::load()` succeeds
//! in a bare environment.

mod engine;
mod error;
mod sharing;

pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use sharing::SharingConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Engine tunables (fees, caps, TTLs).
    #[serde(default)]
    pub engine: EngineConfig,

    /// Public share-link bases.
    #[serde(default)]
    pub sharing: SharingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads a `.env` file first when present (development), then reads
    /// `WAYFARER`-prefixed environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value cannot be parsed into its
    /// expected type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("WAYFARER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.engine.validate()?;
        self.sharing.validate()?;
        Ok(())
    }
}
