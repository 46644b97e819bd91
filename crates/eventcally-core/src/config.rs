use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_DATE_FORMAT, DEFAULT_TIMEZONE, DEFAULT_WINDOW_YEARS,
    MAX_EXPANDED_OCCURRENCES,
};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub recurrence: RecurrenceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Whether materialization keeps occurrences that lie before today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PastOccurrencePolicy {
    /// The expansion window starts at `max(today, start)`.
    #[default]
    Prune,
    /// The expansion window starts at the definition's start.
    Keep,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecurrenceConfig {
    pub timezone: String,
    pub past_occurrences: PastOccurrencePolicy,
    pub window_years: u32,
    pub batch_size: usize,
    pub date_format: String,
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            past_occurrences: PastOccurrencePolicy::default(),
            window_years: DEFAULT_WINDOW_YEARS,
            batch_size: DEFAULT_BATCH_SIZE,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl RecurrenceConfig {
    /// ## Summary
    /// Resolves the configured IANA zone name.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` if the name is unknown.
    pub fn timezone(&self) -> CoreResult<chrono_tz::Tz> {
        self.timezone.parse::<chrono_tz::Tz>().map_err(|err| {
            CoreError::InvalidConfiguration(format!("recurrence.timezone {}: {err}", self.timezone))
        })
    }

    /// ## Summary
    /// Checks the numeric settings.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` for a zero window or a batch
    /// size outside `1..=MAX_EXPANDED_OCCURRENCES`.
    pub fn validate(&self) -> CoreResult<()> {
        if self.batch_size == 0 {
            return Err(CoreError::InvalidConfiguration(
                "recurrence.batch_size must be positive".to_string(),
            ));
        }
        if self.batch_size > MAX_EXPANDED_OCCURRENCES {
            return Err(CoreError::InvalidConfiguration(format!(
                "recurrence.batch_size must not exceed {MAX_EXPANDED_OCCURRENCES}"
            )));
        }
        if self.window_years == 0 {
            return Err(CoreError::InvalidConfiguration(
                "recurrence.window_years must be positive".to_string(),
            ));
        }
        self.timezone().map(|_| ())
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional `config.toml`.
    /// Environment variables take precedence over `.env` file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("logging.level", "debug")?
            .set_default("recurrence.timezone", DEFAULT_TIMEZONE)?
            .set_default("recurrence.past_occurrences", "prune")?
            .set_default("recurrence.window_years", i64::from(DEFAULT_WINDOW_YEARS))?
            .set_default("recurrence.batch_size", u64::try_from(DEFAULT_BATCH_SIZE)?)?
            .set_default("recurrence.date_format", DEFAULT_DATE_FORMAT)?
            // Env file
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?;

        settings.recurrence.validate()?;
        Ok(settings)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    if let Err(err) = dotenvy::dotenv() {
        tracing::debug!(error = %err, "No .env file loaded");
    }

    Settings::load()
}
