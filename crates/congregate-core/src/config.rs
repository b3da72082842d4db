use anyhow::Result;
use chrono_tz::Tz;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder};
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub calendar: CalendarConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Recurrence generation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// IANA zone whose wall clock drives day and month stepping.
    pub timezone: String,
    /// How far ahead instances of a recurring series are generated.
    pub horizon_years: u32,
}

impl CalendarConfig {
    /// ## Summary
    /// Resolves the configured IANA timezone.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` if the name is not a known zone.
    pub fn tz(&self) -> CoreResult<Tz> {
        self.timezone.parse::<Tz>().map_err(|_err| {
            CoreError::InvalidConfiguration(format!("unknown timezone '{}'", self.timezone))
        })
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            horizon_years: 1,
        }
    }
}

impl Settings {
    /// ## Summary
    /// Returns a configuration builder with every default applied.
    ///
    /// ## Errors
    /// Returns an error if a default value cannot be set.
    pub fn builder() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("database.max_connections", 4)?
            .set_default("logging.level", "debug")?
            .set_default("calendar.timezone", "UTC")?
            .set_default("calendar.horizon_years", 1)?)
    }

    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into a `Settings`.
    /// Environment variables take precedence over `config.toml` values.
    ///
    /// Variables are prefixed with `CONGREGATE_` and use `__` between a section and
    /// its key, e.g. `CONGREGATE_CALENDAR__HORIZON_YEARS`.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Self::builder()?
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            // Env file and process environment
            .add_source(
                config::Environment::with_prefix("CONGREGATE")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?
            .validated()?)
    }

    /// ## Summary
    /// Checks values that deserialize but cannot be used.
    ///
    /// ## Errors
    /// Returns `CoreError` for an empty pool, a zero horizon or an unknown timezone.
    pub fn validated(self) -> CoreResult<Self> {
        if self.database.max_connections == 0 {
            return Err(CoreError::OutOfRange {
                key: "database.max_connections",
                min: 1,
                value: 0,
            });
        }
        if self.calendar.horizon_years == 0 {
            return Err(CoreError::OutOfRange {
                key: "calendar.horizon_years",
                min: 1,
                value: 0,
            });
        }
        self.calendar.tz()?;
        Ok(self)
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
