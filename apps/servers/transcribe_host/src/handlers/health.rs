use crate::error::HostError;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;
use tracing::instrument;
use transcript_queue::QueueDepth;

#[derive(Serialize)]
pub struct HealthResponse {
	status: &'static str,
	version: &'static str,
	queue: QueueDepth,
}

#[axum::debug_handler]
#[instrument(name = "health", skip(state))]
pub async fn health(State(state): State<AppState>) -> Result<(StatusCode, Json<HealthResponse>), HostError> {
	let queue = state.datastore.queue_depth().await?;

	let response = HealthResponse {
		status: "healthy",
		version: env!("CARGO_PKG_VERSION"),
		queue,
	};

	Ok((StatusCode::OK, Json(response)))
}
