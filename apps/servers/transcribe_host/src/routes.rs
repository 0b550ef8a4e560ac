use crate::handlers::{blobs, health, queue};
use crate::state::AppState;
use axum::extract::FromRef;
use axum::routing::{get, post, put};
use axum::Router;

pub fn queue_routes<S>() -> Router<S>
where
	S: Clone + Send + Sync + 'static,
	AppState: FromRef<S>,
{
	Router::new()
		.route("/queue/ingest", post(queue::ingest))
		.route("/queue/claim", post(queue::claim))
		.route("/queue/items", get(queue::get_items))
		.route("/queue/items/:hash", get(queue::get_item))
		.route("/queue/items/:hash/progress", post(queue::mark_in_progress))
		.route("/queue/items/:hash/transcript", post(queue::report_result))
}

pub fn blob_routes<S>() -> Router<S>
where
	S: Clone + Send + Sync + 'static,
	AppState: FromRef<S>,
{
	Router::new().route("/blobs/:hash", put(blobs::put_blob).get(blobs::get_blob).delete(blobs::delete_blob))
}

pub fn health_routes<S>() -> Router<S>
where
	S: Clone + Send + Sync + 'static,
	AppState: FromRef<S>,
{
	Router::new().route("/health", get(health::health))
}
