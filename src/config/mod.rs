//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MEETING_SCHEDULER` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use meeting_scheduler::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod calendar;
mod error;
mod notification;
mod scheduler;
mod server;
mod storage;

pub use calendar::CalendarConfig;
pub use error::{ConfigError, ValidationError};
pub use notification::NotificationConfig;
pub use scheduler::SchedulerConfig;
pub use server::{Environment, ServerConfig};
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// development setup: in-memory storage, log-only notifications, UTC.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Saturday policy and timezone
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Cron expressions and pass tuning
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Relay endpoints and message branding
    #[serde(default)]
    pub notification: NotificationConfig,

    /// Meeting storage backend
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MEETING_SCHEDULER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MEETING_SCHEDULER__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `MEETING_SCHEDULER__CALENDAR__TIMEZONE=Asia/Kolkata` -> `calendar.timezone`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MEETING_SCHEDULER")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.calendar.validate()?;
        self.scheduler.validate()?;
        self.notification.validate()?;
        self.storage.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
