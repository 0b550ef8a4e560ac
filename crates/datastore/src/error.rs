#[derive(Debug, thiserror::Error)]
pub enum DataStoreError {
	#[error("queue error: {0}")]
	Queue(#[from] transcript_queue::QueueError),

	#[error("blob error: {0}")]
	Blob(#[from] blob_store::BlobError),

	#[error("ingest batch shape mismatch: {audio} audio buffers, {hashes} hashes, {times} timestamp sets")]
	BatchShape { audio: usize, hashes: usize, times: usize },
}
