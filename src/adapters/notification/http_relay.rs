//! HTTP relay dispatcher - delivers notifications through outbound webhooks.
//!
//! Email goes to a relay endpoint that accepts `{ email, subject, message }`
//! JSON and forwards it to the mail system. Chat messages go to a messaging
//! API when the user has a mobile number and a chat endpoint is configured.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpRelayConfig::new()
//!     .with_email_relay_url("https://relay.example.com/mail")
//!     .with_chat_api("https://chat.example.com/messages", token);
//!
//! let dispatcher = HttpRelayDispatcher::new(config, MessageTemplates::default())?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use std::time::Duration;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::meeting::{RecurringMeeting, UserRef};
use crate::ports::{ChannelOutcome, DispatchResult, NotificationDispatcher, NotificationKind};

use super::templates::{MessageTemplates, RenderedMessage};

/// Endpoints and credentials for the relay.
#[derive(Debug, Clone)]
pub struct HttpRelayConfig {
    /// Email relay endpoint. Email is skipped when unset.
    pub email_relay_url: Option<String>,
    /// Chat API endpoint. Chat is skipped when unset.
    pub chat_api_url: Option<String>,
    chat_token: Option<Secret<String>>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for HttpRelayConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpRelayConfig {
    pub fn new() -> Self {
        Self {
            email_relay_url: None,
            chat_api_url: None,
            chat_token: None,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_email_relay_url(mut self, url: impl Into<String>) -> Self {
        self.email_relay_url = Some(url.into());
        self
    }

    pub fn with_chat_api(mut self, url: impl Into<String>, token: Option<Secret<String>>) -> Self {
        self.chat_api_url = Some(url.into());
        self.chat_token = token;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct EmailRelayRequest<'a> {
    email: &'a str,
    subject: &'a str,
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    to: &'a str,
    body: &'a str,
}

/// NotificationDispatcher backed by HTTP webhooks.
pub struct HttpRelayDispatcher {
    config: HttpRelayConfig,
    templates: MessageTemplates,
    client: Client,
}

impl HttpRelayDispatcher {
    pub fn new(config: HttpRelayConfig, templates: MessageTemplates) -> Result<Self, DomainError> {
        let client = Client::builder().timeout(config.timeout).build().map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to create HTTP client: {}", e),
            )
        })?;

        Ok(Self {
            config,
            templates,
            client,
        })
    }

    async fn dispatch(
        &self,
        kind: NotificationKind,
        user: &UserRef,
        meeting: &RecurringMeeting,
    ) -> DispatchResult {
        let message = self.templates.render(kind, user, meeting);
        let email = self.send_email(user, &message).await;
        let chat = self.send_chat(user, &message).await;

        tracing::debug!(
            meeting_id = %meeting.id,
            user_id = %user.id,
            kind = %kind,
            email = ?email,
            chat = ?chat,
            "Notification relayed"
        );

        DispatchResult::new(email, chat)
    }

    async fn send_email(&self, user: &UserRef, message: &RenderedMessage) -> ChannelOutcome {
        let Some(url) = &self.config.email_relay_url else {
            return ChannelOutcome::Skipped;
        };

        let request = EmailRelayRequest {
            email: &user.email,
            subject: &message.subject,
            message: &message.html,
        };

        match self.client.post(url).json(&request).send().await {
            Ok(response) => outcome_from_response(response).await,
            Err(e) => ChannelOutcome::Failed(describe_send_error(&e)),
        }
    }

    async fn send_chat(&self, user: &UserRef, message: &RenderedMessage) -> ChannelOutcome {
        let (Some(url), Some(mobile)) = (&self.config.chat_api_url, &user.mobile) else {
            return ChannelOutcome::Skipped;
        };

        let request = ChatRequest {
            to: mobile,
            body: &message.text,
        };

        let mut builder = self.client.post(url).json(&request);
        if let Some(token) = &self.config.chat_token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        match builder.send().await {
            Ok(response) => outcome_from_response(response).await,
            Err(e) => ChannelOutcome::Failed(describe_send_error(&e)),
        }
    }
}

async fn outcome_from_response(response: Response) -> ChannelOutcome {
    let status = response.status();
    if status.is_success() {
        return ChannelOutcome::Delivered;
    }

    let body = response.text().await.unwrap_or_default();
    let body: String = body.chars().take(200).collect();
    ChannelOutcome::Failed(format!("relay returned {}: {}", status, body))
}

fn describe_send_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        err.to_string()
    }
}

#[async_trait]
impl NotificationDispatcher for HttpRelayDispatcher {
    async fn send_reminder(&self, user: &UserRef, meeting: &RecurringMeeting) -> DispatchResult {
        self.dispatch(NotificationKind::Reminder, user, meeting).await
    }

    async fn send_check_in(&self, user: &UserRef, meeting: &RecurringMeeting) -> DispatchResult {
        self.dispatch(NotificationKind::CheckIn, user, meeting).await
    }

    async fn send_meeting_created(
        &self,
        user: &UserRef,
        meeting: &RecurringMeeting,
    ) -> DispatchResult {
        self.dispatch(NotificationKind::MeetingCreated, user, meeting)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calendar::Frequency;
    use crate::domain::foundation::{MeetingId, UserId};
    use crate::domain::meeting::{MeetingDetails, StakeholderRef};
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use chrono::NaiveDate;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    // ════════════════════════════════════════════════════════════════════════════════
    // Test relay server
    // ════════════════════════════════════════════════════════════════════════════════

    #[derive(Clone, Default)]
    struct Captured {
        emails: Arc<Mutex<Vec<Value>>>,
        chats: Arc<Mutex<Vec<(Option<String>, Value)>>>,
    }

    async fn capture_email(State(c): State<Captured>, Json(body): Json<Value>) -> StatusCode {
        c.emails.lock().unwrap().push(body);
        StatusCode::OK
    }

    async fn capture_chat(
        State(c): State<Captured>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> StatusCode {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        c.chats.lock().unwrap().push((auth, body));
        StatusCode::OK
    }

    async fn reject() -> (StatusCode, &'static str) {
        (StatusCode::SERVICE_UNAVAILABLE, "mailbox offline")
    }

    async fn start_relay() -> (String, Captured) {
        let captured = Captured::default();
        let app = Router::new()
            .route("/mail", post(capture_email))
            .route("/chat", post(capture_chat))
            .route("/down", post(reject))
            .with_state(captured.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), captured)
    }

    fn user(mobile: Option<&str>) -> UserRef {
        UserRef::new(
            UserId::new("u-1").unwrap(),
            "Priya",
            "priya@example.com",
            mobile.map(str::to_string),
        )
        .unwrap()
    }

    fn meeting() -> RecurringMeeting {
        RecurringMeeting::schedule(
            MeetingId::new(),
            MeetingDetails {
                title: "Vendor sync".to_string(),
                stakeholder: StakeholderRef::new("Kim Park", None).unwrap(),
                frequency: Frequency::Weekly,
                assigned_to: vec![user(None)],
                notes: None,
            },
            NaiveDate::from_ymd_opt(2026, 3, 11).unwrap(),
            UserId::new("u-1").unwrap(),
        )
        .unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn email_is_posted_to_relay() {
        let (base, captured) = start_relay().await;
        let dispatcher = HttpRelayDispatcher::new(
            HttpRelayConfig::new().with_email_relay_url(format!("{}/mail", base)),
            MessageTemplates::default(),
        )
        .unwrap();

        let result = dispatcher.send_reminder(&user(None), &meeting()).await;

        assert_eq!(result.email, ChannelOutcome::Delivered);
        assert_eq!(result.chat, ChannelOutcome::Skipped);
        let emails = captured.emails.lock().unwrap();
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0]["email"], "priya@example.com");
        assert_eq!(emails[0]["subject"], "Meeting Reminder: Vendor sync with Kim Park");
    }

    #[tokio::test]
    async fn chat_is_sent_with_bearer_token_when_user_has_mobile() {
        let (base, captured) = start_relay().await;
        let dispatcher = HttpRelayDispatcher::new(
            HttpRelayConfig::new()
                .with_email_relay_url(format!("{}/mail", base))
                .with_chat_api(
                    format!("{}/chat", base),
                    Some(Secret::new("chat-token".to_string())),
                ),
            MessageTemplates::default(),
        )
        .unwrap();

        let result = dispatcher
            .send_check_in(&user(Some("+15550100")), &meeting())
            .await;

        assert!(result.email.is_delivered());
        assert!(result.chat.is_delivered());
        let chats = captured.chats.lock().unwrap();
        assert_eq!(chats[0].0.as_deref(), Some("Bearer chat-token"));
        assert_eq!(chats[0].1["to"], "+15550100");
    }

    #[tokio::test]
    async fn relay_error_status_is_reported_as_failure() {
        let (base, _captured) = start_relay().await;
        let dispatcher = HttpRelayDispatcher::new(
            HttpRelayConfig::new().with_email_relay_url(format!("{}/down", base)),
            MessageTemplates::default(),
        )
        .unwrap();

        let result = dispatcher.send_reminder(&user(None), &meeting()).await;

        let reason = result.email.failure().unwrap();
        assert!(reason.contains("503"));
        assert!(reason.contains("mailbox offline"));
    }

    #[tokio::test]
    async fn unconfigured_channels_are_skipped() {
        let dispatcher =
            HttpRelayDispatcher::new(HttpRelayConfig::new(), MessageTemplates::default()).unwrap();

        let result = dispatcher
            .send_meeting_created(&user(Some("+15550100")), &meeting())
            .await;

        assert_eq!(result.email, ChannelOutcome::Skipped);
        assert_eq!(result.chat, ChannelOutcome::Skipped);
    }
}
