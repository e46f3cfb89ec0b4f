//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid host address: {0}")]
    InvalidHost(String),

    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid cron expression for {pass}: {reason}")]
    InvalidCron { pass: &'static str, reason: String },

    #[error("{0} must be at least 1")]
    InvalidConcurrency(&'static str),

    #[error("Catch-up window must be between 0 and 6 days")]
    InvalidCatchUpDays,

    #[error("Invalid batch timeout")]
    InvalidBatchTimeout,

    #[error("Invalid URL for {0}")]
    InvalidUrl(&'static str),

    #[error("Chat API URL is set but no chat token was provided")]
    MissingChatToken,
}
