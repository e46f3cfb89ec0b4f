//! Meeting scheduler service.
//!
//! Serves the meeting API and runs the cron-driven reminder, check-in and
//! rollover passes until Ctrl-C.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method};
use secrecy::Secret;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use meeting_scheduler::adapters::http::{app_router, MeetingAppState};
use meeting_scheduler::adapters::{
    CronTrigger, FileMeetingRepository, HttpRelayConfig, HttpRelayDispatcher,
    InMemoryMeetingRepository, LoggingDispatcher, MessageTemplates, SystemClock,
};
use meeting_scheduler::application::handlers::MeetingLifecycleScheduler;
use meeting_scheduler::config::{AppConfig, NotificationConfig, StorageBackend, StorageConfig};
use meeting_scheduler::ports::{MeetingRepository, NotificationDispatcher};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let tz = config.calendar.tz()?;
    let calendar = config.calendar.business_calendar();
    let clock = Arc::new(SystemClock::new(tz));
    let repository = build_repository(&config.storage);
    let dispatcher = build_dispatcher(&config.notification)?;

    tracing::info!(
        environment = ?config.server.environment,
        timezone = %tz,
        saturday_policy = %config.calendar.saturday_policy.as_str(),
        storage = ?config.storage.backend,
        relay = config.notification.has_relay(),
        "Starting meeting scheduler"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let trigger_handle = if config.scheduler.enabled {
        let scheduler = Arc::new(MeetingLifecycleScheduler::new(
            repository.clone(),
            dispatcher.clone(),
            clock.clone(),
            calendar,
            config.scheduler.lifecycle_settings(),
        ));
        let trigger = CronTrigger::new(scheduler, config.scheduler.trigger_config(tz))?;
        Some(tokio::spawn(async move {
            if let Err(e) = trigger.run(shutdown_rx).await {
                tracing::error!(error = %e, "Cron trigger stopped");
            }
        }))
    } else {
        tracing::warn!("Scheduler disabled; only manual operations will run");
        None
    };

    let state = MeetingAppState {
        meeting_repository: repository,
        dispatcher,
        clock,
        calendar,
        dispatch_policy: config.scheduler.dispatch_policy(),
    };

    let app = app_router(state)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config.server.cors_origins_list()))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    if let Some(handle) = trigger_handle {
        let _ = handle.await;
    }
    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_repository(storage: &StorageConfig) -> Arc<dyn MeetingRepository> {
    match (storage.backend, &storage.data_dir) {
        (StorageBackend::File, Some(dir)) => {
            tracing::info!(data_dir = %dir.display(), "Using file meeting storage");
            Arc::new(FileMeetingRepository::new(dir))
        }
        _ => {
            tracing::warn!("Using in-memory meeting storage; data is lost on restart");
            Arc::new(InMemoryMeetingRepository::new())
        }
    }
}

fn build_dispatcher(
    notification: &NotificationConfig,
) -> Result<Arc<dyn NotificationDispatcher>, BoxError> {
    let templates = MessageTemplates::new(
        notification.frontend_url.clone(),
        notification.sender_name.clone(),
    );

    if !notification.has_relay() {
        tracing::warn!("No notification relay configured; messages will only be logged");
        return Ok(Arc::new(LoggingDispatcher::new(templates)));
    }

    let mut relay = HttpRelayConfig::new()
        .with_timeout(Duration::from_secs(notification.timeout_secs));
    if let Some(url) = &notification.email_relay_url {
        relay = relay.with_email_relay_url(url.clone());
    }
    if let Some(url) = &notification.chat_api_url {
        let token: Option<Secret<String>> = notification.chat_token.clone();
        relay = relay.with_chat_api(url.clone(), token);
    }
    Ok(Arc::new(HttpRelayDispatcher::new(relay, templates)?))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(allowed)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
