use crate::error::HostError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use tracing::instrument;

#[axum::debug_handler]
#[instrument(name = "put_blob", skip(state, body))]
pub async fn put_blob(State(state): State<AppState>, Path(hash): Path<String>, body: Bytes) -> Result<StatusCode, HostError> {
	state.datastore.put_blob(&hash, body).await?;
	Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
#[instrument(name = "get_blob", skip(state))]
pub async fn get_blob(State(state): State<AppState>, Path(hash): Path<String>) -> Result<Response, HostError> {
	let data = state.datastore.get_blob(&hash).await?;
	Ok(([(header::CONTENT_TYPE, "application/octet-stream")], data).into_response())
}

#[axum::debug_handler]
#[instrument(name = "delete_blob", skip(state))]
pub async fn delete_blob(State(state): State<AppState>, Path(hash): Path<String>) -> Result<StatusCode, HostError> {
	state.datastore.remove_blob(&hash).await?;
	Ok(StatusCode::NO_CONTENT)
}
