use crate::error::HostError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use bytes::Bytes;
use datastore::IngestReport;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::instrument;
use transcript_queue::{QueueItem, UpdateOutcome};

/// Parallel arrays, one entry per audio clip. Audio travels hex-encoded so
/// the batch stays a single JSON document.
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
	pub audio: Vec<String>,
	pub hashes: Vec<String>,
	#[serde(default)]
	pub times_list: Vec<HashMap<String, f64>>,
}

#[derive(Debug, Deserialize)]
pub struct ItemsQuery {
	pub hashes: String,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
	pub transcript: String,
	#[serde(default)]
	pub from_queue: bool,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
	pub outcome: UpdateOutcome,
}

#[axum::debug_handler]
#[instrument(name = "ingest", skip(state, request), fields(batch = request.audio.len()))]
pub async fn ingest(State(state): State<AppState>, Json(request): Json<IngestRequest>) -> Result<Json<IngestReport>, HostError> {
	let mut audio_batch = Vec::with_capacity(request.audio.len());
	for encoded in &request.audio {
		let decoded = hex::decode(encoded).map_err(|e| HostError::InvalidPayload(format!("audio is not valid hex: {e}")))?;
		audio_batch.push(Bytes::from(decoded));
	}

	let times_list = if request.times_list.is_empty() {
		vec![HashMap::new(); request.hashes.len()]
	} else {
		request.times_list
	};

	let report = state.datastore.ingest(audio_batch, request.hashes, times_list).await?;
	Ok(Json(report))
}

#[axum::debug_handler]
#[instrument(name = "claim", skip(state))]
pub async fn claim(State(state): State<AppState>) -> Result<Response, HostError> {
	match state.datastore.claim_next().await? {
		Some(item) => Ok(Json(item).into_response()),
		None => Ok(StatusCode::NO_CONTENT.into_response()),
	}
}

#[axum::debug_handler]
#[instrument(name = "get_item", skip(state))]
pub async fn get_item(State(state): State<AppState>, Path(hash): Path<String>) -> Result<Json<QueueItem>, HostError> {
	state.datastore.get_by_hash(&hash).await?.map(Json).ok_or(HostError::NotFound)
}

#[axum::debug_handler]
#[instrument(name = "get_items", skip(state))]
pub async fn get_items(State(state): State<AppState>, Query(query): Query<ItemsQuery>) -> Result<Json<Vec<QueueItem>>, HostError> {
	let items = state.datastore.get_by_hash_batch(&query.hashes).await?;
	Ok(Json(items))
}

#[axum::debug_handler]
#[instrument(name = "mark_in_progress", skip(state))]
pub async fn mark_in_progress(State(state): State<AppState>, Path(hash): Path<String>) -> Result<StatusCode, HostError> {
	if state.datastore.mark_in_progress(&hash).await? {
		Ok(StatusCode::NO_CONTENT)
	} else {
		Err(HostError::NotFound)
	}
}

#[axum::debug_handler]
#[instrument(name = "report_result", skip(state, request))]
pub async fn report_result(State(state): State<AppState>, Path(hash): Path<String>, Json(request): Json<ReportRequest>) -> Result<Json<ReportResponse>, HostError> {
	let outcome = state.datastore.report_result(&hash, &request.transcript, request.from_queue).await?;
	if outcome == UpdateOutcome::NotFound {
		return Err(HostError::NotFound);
	}
	Ok(Json(ReportResponse { outcome }))
}
