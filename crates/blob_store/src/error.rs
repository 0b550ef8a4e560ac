#[derive(Debug, thiserror::Error)]
pub enum BlobError {
	#[error("invalid blob key {0:?}")]
	InvalidKey(String),

	#[error("no blob stored for hash {0}")]
	NotFound(String),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("remote backend error: {0}")]
	Http(#[from] reqwest::Error),

	#[error("remote backend returned status {0}")]
	RemoteStatus(u16),

	#[error("blob write failed after {attempts} attempts: {source}")]
	RetryExhausted {
		attempts: usize,
		#[source]
		source: Box<BlobError>,
	},
}
