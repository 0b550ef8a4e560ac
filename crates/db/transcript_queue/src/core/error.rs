#[derive(Debug, thiserror::Error)]
pub enum QueueError {
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),

	#[error("transcript of {len} chars exceeds the {max} char column bound")]
	TranscriptTooLong { len: usize, max: usize },
}
