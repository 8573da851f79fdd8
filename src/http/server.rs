//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, concurrency limit)
//! - Bind server to listener
//! - Apply configuration updates while running
//! - Graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, http::Request, middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::{limit::GlobalConcurrencyLimitLayer, ServiceBuilder};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::handlers::{health, log_message};
use crate::http::request::{RequestIdExt, UuidRequestId};
use crate::lifecycle::shutdown;
use crate::log_service::{LogService, LogSink, TracingSink};
use crate::observability::logging::LogLevelHandle;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub log_service: LogService,
}

/// HTTP server for the log endpoint.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    log_level: Option<LogLevelHandle>,
}

impl HttpServer {
    /// Create a server that records messages to the process-wide tracing subscriber.
    pub fn new(config: AppConfig) -> Self {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    /// Create a server that records messages to `sink`.
    pub fn with_sink(config: AppConfig, sink: Arc<dyn LogSink>) -> Self {
        let state = AppState {
            log_service: LogService::new(sink),
        };
        let router = Self::build_router(&config, state);

        Self {
            router,
            config,
            log_level: None,
        }
    }

    /// Let configuration reloads change the active log filter.
    pub fn with_log_level_handle(mut self, handle: LogLevelHandle) -> Self {
        self.log_level = Some(handle);
        self
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let middleware_stack = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(GlobalConcurrencyLimitLayer::new(
                config.listener.max_concurrent_requests,
            ));

        Router::new()
            .route(&config.http.log_path, get(log_message))
            .route(&config.http.health_path, get(health))
            .route_layer(middleware::from_fn(metrics::track_requests))
            .with_state(state)
            .layer(middleware_stack)
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    ///
    /// Configurations received on `config_updates` are applied as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<AppConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            log_path = %self.config.http.log_path,
            health_path = %self.config.http.health_path,
            "HTTP server starting"
        );

        let reloader = tokio::spawn(apply_config_updates(
            self.config.clone(),
            config_updates,
            self.log_level.clone(),
        ));

        let result = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown::wait_for(shutdown).await;
                tracing::info!("Shutdown signal received");
            })
            .await;

        reloader.abort();
        result?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for serving without a listener (e.g. `tower::ServiceExt::oneshot`).
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

fn request_span(request: &Request<Body>) -> tracing::Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request.request_id(),
    )
}

/// Apply updates until the sender is dropped, returning the configuration in effect.
async fn apply_config_updates(
    mut current: AppConfig,
    mut updates: mpsc::UnboundedReceiver<AppConfig>,
    log_level: Option<LogLevelHandle>,
) -> AppConfig {
    while let Some(next) = updates.recv().await {
        apply_update(&mut current, next, log_level.as_ref());
    }
    current
}

/// Fold `next` into `current`.
///
/// `current.observability.log_level` only changes once the filter reload
/// succeeded, so a failed level is retried by the next update carrying it.
fn apply_update(current: &mut AppConfig, next: AppConfig, log_level: Option<&LogLevelHandle>) {
    for section in restart_required(current, &next) {
        tracing::warn!(section, "Configuration change takes effect after restart");
    }

    let previous_level = current.observability.log_level.clone();
    let level = &next.observability.log_level;
    let level_applied = *level == previous_level
        || match log_level {
            Some(handle) => match handle.set_level(level) {
                Ok(()) => {
                    tracing::info!(log_level = %level, "Log level updated");
                    true
                }
                Err(e) => {
                    tracing::error!(error = %e, log_level = %level, "Failed to apply log level");
                    false
                }
            },
            None => {
                tracing::warn!(log_level = %level, "Log level reload not available");
                false
            }
        };

    *current = next;
    if !level_applied {
        current.observability.log_level = previous_level;
    }
}

/// Config sections that differ between `current` and `next` and cannot be applied live.
pub fn restart_required(current: &AppConfig, next: &AppConfig) -> Vec<&'static str> {
    let mut sections = Vec::new();
    if current.listener != next.listener {
        sections.push("listener");
    }
    if current.http != next.http {
        sections.push("http");
    }
    if current.timeouts != next.timeouts {
        sections.push("timeouts");
    }
    let (a, b) = (&current.observability, &next.observability);
    if a.log_format != b.log_format
        || a.metrics_enabled != b.metrics_enabled
        || a.metrics_address != b.metrics_address
    {
        sections.push("observability");
    }
    sections
}
