use axum::body::Body;
use axum::http::{Response, StatusCode};
use axum::response::IntoResponse;
use blob_store::BlobError;
use datastore::DataStoreError;
use transcript_queue::QueueError;

#[derive(thiserror::Error, Debug)]
pub enum HostError {
	#[error("request path not found")]
	NotFound,

	#[error("invalid request payload: {0}")]
	InvalidPayload(String),

	#[error("Request timeout")]
	RequestTimeout,

	#[error("Datastore error: {0}")]
	Datastore(#[from] DataStoreError),

	#[error("Unexpected Tower Service error: {0}")]
	TowerError(#[from] tower::BoxError),
}

impl From<QueueError> for HostError {
	fn from(err: QueueError) -> Self {
		Self::Datastore(err.into())
	}
}

impl From<BlobError> for HostError {
	fn from(err: BlobError) -> Self {
		Self::Datastore(err.into())
	}
}

impl HostError {
	fn status_code(&self) -> StatusCode {
		match self {
			Self::NotFound => StatusCode::NOT_FOUND,
			Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
			Self::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
			Self::Datastore(DataStoreError::BatchShape { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
			Self::Datastore(DataStoreError::Queue(QueueError::TranscriptTooLong { .. })) => StatusCode::BAD_REQUEST,
			Self::Datastore(DataStoreError::Blob(BlobError::NotFound(_))) => StatusCode::NOT_FOUND,
			Self::Datastore(DataStoreError::Blob(BlobError::InvalidKey(_))) => StatusCode::BAD_REQUEST,
			Self::Datastore(_) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::TowerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl IntoResponse for HostError {
	fn into_response(self) -> Response<Body> {
		let status = self.status_code();
		if status == StatusCode::INTERNAL_SERVER_ERROR {
			tracing::error!("request failed: {:?}", self);
		}
		(status, self.to_string()).into_response()
	}
}
