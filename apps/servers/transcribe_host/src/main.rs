mod config;
mod error;
mod handlers;
mod routes;
mod state;

use crate::config::Config;
use crate::error::HostError;
use crate::routes::{blob_routes, health_routes, queue_routes};
use crate::state::AppState;
use anyhow::Result;
use axum::{error_handling::HandleErrorLayer, Router};
use clap::Parser;
use std::sync::Arc;
use tokio::{net::TcpListener, time::Duration};
use tokio_util::sync::CancellationToken;
use tower::{timeout::TimeoutLayer, BoxError, ServiceBuilder};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{filter::EnvFilter, fmt::format::JsonFields, util::SubscriberInitExt, Layer};

async fn handle_tower_error(error: BoxError) -> HostError {
	if error.is::<tower::timeout::error::Elapsed>() {
		tracing::warn!("Request timeout: {}", error);
		HostError::RequestTimeout
	} else {
		tracing::error!("Unhandled tower error: {}", error);
		HostError::TowerError(error)
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	dotenv::dotenv().ok();
	let config = Config::parse();
	config.validate().map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

	let _ = init_tracing(&config);

	let config = Arc::new(config);
	let shutdown_token = CancellationToken::new();

	let app_state = AppState::build(config.clone()).await?;

	let app = Router::new()
		.merge(queue_routes())
		.merge(blob_routes())
		.merge(health_routes())
		.with_state(app_state.clone());

	let app = app.layer(
		ServiceBuilder::new()
			.layer(TraceLayer::new_for_http())
			.layer(HandleErrorLayer::new(|error: BoxError| async move { handle_tower_error(error).await }))
			.layer(RequestBodyLimitLayer::new(config.max_request_mb * 1024 * 1024))
			.layer(TimeoutLayer::new(Duration::from_millis(config.request_timeout_ms))),
	);

	let listener = TcpListener::bind(&config.bind_addr).await?;
	tracing::info!("listening on {}", listener.local_addr()?);

	let signal_shutdown_token = shutdown_token.clone();
	tokio::spawn(async move {
		tokio::signal::ctrl_c().await.ok();
		tracing::info!("Received Ctrl+C, initiating shutdown...");
		signal_shutdown_token.cancel();
	});

	let server_token = shutdown_token.clone();
	let server = axum::serve(listener, app).with_graceful_shutdown(async move {
		server_token.cancelled().await;
	});

	server.await?;
	tracing::info!("Server stopped");

	app_state.datastore.queue().close().await;
	tracing::info!("Database closed");

	tracing::info!("Shutdown complete");
	Ok(())
}

#[must_use]
pub fn init_tracing(config: &Config) -> Option<()> {
	use std::str::FromStr;
	use tracing_subscriber::layer::SubscriberExt;

	let filter = EnvFilter::from_str(config.rust_log.as_deref()?).ok()?;

	tracing_subscriber::registry()
		.with(if config.log_json {
			Box::new(
				tracing_subscriber::fmt::layer()
					.fmt_fields(JsonFields::default())
					.event_format(tracing_subscriber::fmt::format().json().flatten_event(true).with_span_list(false))
					.with_filter(filter),
			) as Box<dyn Layer<_> + Send + Sync>
		} else {
			Box::new(
				tracing_subscriber::fmt::layer()
					.event_format(tracing_subscriber::fmt::format().pretty())
					.with_filter(filter),
			)
		})
		.init();
	None
}
