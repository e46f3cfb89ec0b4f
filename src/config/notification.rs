//! Notification configuration

use secrecy::Secret;
use serde::Deserialize;

use super::error::ValidationError;

/// Outbound relay endpoints and message branding.
///
/// With neither relay URL set, notifications are written to the log.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Base URL of the web app, used for meeting links in messages
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,

    /// Sender name shown in message footers
    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    /// Email relay endpoint
    pub email_relay_url: Option<String>,

    /// Chat messaging API endpoint
    pub chat_api_url: Option<String>,

    /// Bearer token for the chat API
    pub chat_token: Option<Secret<String>>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl NotificationConfig {
    /// True when at least one relay endpoint is configured
    pub fn has_relay(&self) -> bool {
        self.email_relay_url.is_some() || self.chat_api_url.is_some()
    }

    /// Validate notification configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_http_url(&self.frontend_url) {
            return Err(ValidationError::InvalidUrl("frontend_url"));
        }
        if let Some(url) = &self.email_relay_url {
            if !is_http_url(url) {
                return Err(ValidationError::InvalidUrl("email_relay_url"));
            }
        }
        if let Some(url) = &self.chat_api_url {
            if !is_http_url(url) {
                return Err(ValidationError::InvalidUrl("chat_api_url"));
            }
            if self.chat_token.is_none() {
                return Err(ValidationError::MissingChatToken);
            }
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            frontend_url: default_frontend_url(),
            sender_name: default_sender_name(),
            email_relay_url: None,
            chat_api_url: None,
            chat_token: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn default_frontend_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_sender_name() -> String {
    "Meeting Scheduler".to_string()
}

fn default_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_defaults() {
        let config = NotificationConfig::default();
        assert!(!config.has_relay());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_chat_requires_token() {
        let config = NotificationConfig {
            chat_api_url: Some("https://chat.example.com/send".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingChatToken)
        ));

        let config = NotificationConfig {
            chat_api_url: Some("https://chat.example.com/send".to_string()),
            chat_token: Some(Secret::new("token".to_string())),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert!(config.has_relay());
    }

    #[test]
    fn test_relay_url_must_be_http() {
        let config = NotificationConfig {
            email_relay_url: Some("ftp://relay".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidUrl("email_relay_url"))
        ));
    }
}
