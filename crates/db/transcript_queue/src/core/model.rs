use serde::{Deserialize, Serialize};

/// Transcript sentinel for a row no worker has touched yet.
pub const NOT_STARTED: &str = "***TODO***";

/// Transcript sentinel while a worker holds the item.
pub const IN_PROGRESS: &str = "***INPROGRESS***";

/// Substring marking transcript content as partial/placeholder.
///
/// Both sentinels contain it, so a queue-originated result may overwrite a
/// sentinel state but never a finished, marker-free transcript.
pub const PARTIAL_MARKER: &str = "***";

/// Upper bound on stored transcript length, in characters.
pub const MAX_TRANSCRIPT_LEN: usize = 4096;

/// One work item per unique content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct QueueItem {
	pub id: i64,
	/// Timed sub-task annotation, `"<start>,<end>,<task>"`. NULL when no
	/// task mapping matched at ingestion.
	pub metas: Option<String>,
	pub transcript: String,
	pub model_config: String,
	pub hash: String,
}

impl QueueItem {
	pub fn state(&self) -> TranscriptState<'_> {
		TranscriptState::of(&self.transcript)
	}
}

/// Insert payload. The transcript always starts at the not-started sentinel,
/// so it is not part of the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQueueItem {
	pub hash: String,
	pub metas: Option<String>,
	pub model_config: String,
}

/// Classification of a stored transcript value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptState<'a> {
	NotStarted,
	InProgress,
	Done(&'a str),
}

impl<'a> TranscriptState<'a> {
	pub fn of(transcript: &'a str) -> Self {
		match transcript {
			NOT_STARTED => Self::NotStarted,
			IN_PROGRESS => Self::InProgress,
			text => Self::Done(text),
		}
	}
}

/// Outcome of a conditional transcript update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
	/// The new text was persisted.
	Applied,
	/// The stored value already equals the new text.
	Unchanged,
	/// A finished transcript exists and the write came from a queue worker.
	Guarded,
	/// No row for this hash. Updates are weak hints, this is not an error.
	NotFound,
}

/// Row counts per transcript state, for health reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueDepth {
	pub not_started: i64,
	pub in_progress: i64,
	pub done: i64,
}
