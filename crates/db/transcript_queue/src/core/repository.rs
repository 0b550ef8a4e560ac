use crate::core::error::QueueError;
use crate::core::model::{NewQueueItem, QueueDepth, QueueItem, UpdateOutcome, IN_PROGRESS, MAX_TRANSCRIPT_LEN, NOT_STARTED, PARTIAL_MARKER};
use crate::core::{queries, schema};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

/// Hourly recycle of pooled connections, tolerating backend restarts.
const POOL_MAX_LIFETIME_SECS: u64 = 3600;

pub struct QueueRepository {
	pool: SqlitePool,
}

impl QueueRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Builds the process-wide pool: recycled hourly, pre-pinged before use.
	pub async fn connect(database_url: &str) -> Result<Self, QueueError> {
		let options = SqliteConnectOptions::from_str(database_url)
			.map_err(|e| QueueError::Database(sqlx::Error::Configuration(e.into())))?
			.create_if_missing(true);

		let pool = SqlitePoolOptions::new()
			.max_connections(10)
			.max_lifetime(Duration::from_secs(POOL_MAX_LIFETIME_SECS))
			.test_before_acquire(true)
			.connect_with(options)
			.await?;

		Ok(Self { pool })
	}

	pub async fn init_schema(&self) -> Result<(), QueueError> {
		schema::init_schema(&self.pool).await?;
		Ok(())
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	pub async fn close(&self) {
		self.pool.close().await;
	}

	pub async fn find_by_hash(&self, hash: &str) -> Result<Option<QueueItem>, QueueError> {
		Ok(queries::fetch_by_hash(&self.pool, hash).await?)
	}

	/// Comma-joined hash lookup. Result order does not follow input order.
	pub async fn find_by_hash_batch(&self, csv_hashes: &str) -> Result<Vec<QueueItem>, QueueError> {
		let hashes: Vec<&str> = csv_hashes.split(',').map(str::trim).filter(|h| !h.is_empty()).collect();
		Ok(queries::fetch_by_hashes(&self.pool, &hashes).await?)
	}

	/// Idempotent insert; `false` means a row with this hash already exists.
	pub async fn insert(&self, item: NewQueueItem) -> Result<bool, QueueError> {
		Ok(queries::insert_item(&self.pool, &item).await?)
	}

	/// Hands out one work item: the oldest not-started row, atomically
	/// transitioned to in-progress. With nothing untouched left, falls back
	/// to a uniformly random in-progress row (already marked, returned
	/// as-is). `None` means no work is available.
	pub async fn claim_next(&self) -> Result<Option<QueueItem>, QueueError> {
		if let Some(item) = queries::claim_oldest(&self.pool, NOT_STARTED, IN_PROGRESS).await? {
			tracing::debug!(hash = %item.hash, "claimed not-started item");
			return Ok(Some(item));
		}

		let stalled = queries::pick_random_in_state(&self.pool, IN_PROGRESS).await?;
		if let Some(item) = &stalled {
			tracing::debug!(hash = %item.hash, "no untouched items, re-issuing an in-progress one");
		}
		Ok(stalled)
	}

	/// Unconditionally parks the row at the in-progress sentinel. Destroys
	/// any partial content already stored for this hash; callers racing
	/// `report_result` must expect that. `false` when the hash is unknown.
	pub async fn mark_in_progress(&self, hash: &str) -> Result<bool, QueueError> {
		Ok(queries::set_transcript(&self.pool, hash, IN_PROGRESS).await? > 0)
	}

	/// Conditional result write. Queue-originated updates only land while
	/// the stored transcript still carries the partial marker; identical
	/// text is never rewritten; an unknown hash is a no-op outcome.
	pub async fn report_result(&self, hash: &str, transcript: &str, from_queue: bool) -> Result<UpdateOutcome, QueueError> {
		let len = transcript.chars().count();
		if len > MAX_TRANSCRIPT_LEN {
			return Err(QueueError::TranscriptTooLong { len, max: MAX_TRANSCRIPT_LEN });
		}

		let affected = queries::set_transcript_guarded(&self.pool, hash, transcript, from_queue, PARTIAL_MARKER).await?;
		if affected > 0 {
			return Ok(UpdateOutcome::Applied);
		}

		// Nothing written: classify for the caller.
		match queries::fetch_by_hash(&self.pool, hash).await? {
			None => Ok(UpdateOutcome::NotFound),
			Some(row) if row.transcript == transcript => Ok(UpdateOutcome::Unchanged),
			Some(_) => Ok(UpdateOutcome::Guarded),
		}
	}

	pub async fn count_by_state(&self) -> Result<QueueDepth, QueueError> {
		let not_started = queries::count_in_state(&self.pool, NOT_STARTED).await?;
		let in_progress = queries::count_in_state(&self.pool, IN_PROGRESS).await?;
		let total = queries::count_all(&self.pool).await?;

		Ok(QueueDepth {
			not_started,
			in_progress,
			done: total - not_started - in_progress,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashSet;

	async fn test_repo() -> QueueRepository {
		// Single connection: each pooled sqlite::memory: connection would
		// otherwise see its own empty database.
		let pool = SqlitePoolOptions::new().max_connections(1).connect("sqlite::memory:").await.unwrap();
		let repo = QueueRepository::new(pool);
		repo.init_schema().await.unwrap();
		repo
	}

	fn item(hash: &str) -> NewQueueItem {
		NewQueueItem {
			hash: hash.to_string(),
			metas: None,
			model_config: "large".to_string(),
		}
	}

	#[tokio::test]
	async fn duplicate_hash_inserts_once() {
		let repo = test_repo().await;

		assert!(repo.insert(item("h1")).await.unwrap());
		assert!(!repo.insert(item("h1")).await.unwrap());

		let depth = repo.count_by_state().await.unwrap();
		assert_eq!(depth.not_started, 1);
		assert_eq!(depth.in_progress + depth.done, 0);
	}

	#[tokio::test]
	async fn new_rows_start_at_the_todo_sentinel() {
		let repo = test_repo().await;
		repo.insert(item("h1")).await.unwrap();

		let row = repo.find_by_hash("h1").await.unwrap().unwrap();
		assert_eq!(row.transcript, NOT_STARTED);
		assert_eq!(row.model_config, "large");
		assert_eq!(row.metas, None);
	}

	#[tokio::test]
	async fn batch_lookup_matches_known_hashes_only() {
		let repo = test_repo().await;
		repo.insert(item("h1")).await.unwrap();
		repo.insert(item("h2")).await.unwrap();

		let rows = repo.find_by_hash_batch("h2,h1,unknown").await.unwrap();
		let found: HashSet<String> = rows.into_iter().map(|r| r.hash).collect();
		assert_eq!(found, HashSet::from(["h1".to_string(), "h2".to_string()]));

		assert!(repo.find_by_hash_batch("").await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn claim_prefers_not_started_and_marks_it() {
		let repo = test_repo().await;
		repo.insert(item("stalled")).await.unwrap();
		repo.mark_in_progress("stalled").await.unwrap();
		repo.insert(item("fresh")).await.unwrap();

		let claimed = repo.claim_next().await.unwrap().unwrap();
		assert_eq!(claimed.hash, "fresh");
		assert_eq!(claimed.transcript, IN_PROGRESS);

		// And the stored row transitioned with it
		let row = repo.find_by_hash("fresh").await.unwrap().unwrap();
		assert_eq!(row.transcript, IN_PROGRESS);
	}

	#[tokio::test]
	async fn claim_follows_insertion_order() {
		let repo = test_repo().await;
		for hash in ["a", "b", "c"] {
			repo.insert(item(hash)).await.unwrap();
		}

		assert_eq!(repo.claim_next().await.unwrap().unwrap().hash, "a");
		assert_eq!(repo.claim_next().await.unwrap().unwrap().hash, "b");
		assert_eq!(repo.claim_next().await.unwrap().unwrap().hash, "c");
	}

	#[tokio::test]
	async fn claim_falls_back_to_random_in_progress() {
		let repo = test_repo().await;
		repo.insert(item("h1")).await.unwrap();
		repo.insert(item("h2")).await.unwrap();
		repo.mark_in_progress("h1").await.unwrap();
		repo.mark_in_progress("h2").await.unwrap();

		let mut seen = HashSet::new();
		for _ in 0..200 {
			let claimed = repo.claim_next().await.unwrap().unwrap();
			assert_eq!(claimed.transcript, IN_PROGRESS);
			seen.insert(claimed.hash);
		}
		// Uniform pick over two items reaches both long before 200 draws
		assert_eq!(seen.len(), 2);
	}

	#[tokio::test]
	async fn claim_on_empty_queue_returns_none() {
		let repo = test_repo().await;
		assert!(repo.claim_next().await.unwrap().is_none());

		// Finished items are not claimable either
		repo.insert(item("h1")).await.unwrap();
		repo.report_result("h1", "done text", false).await.unwrap();
		assert!(repo.claim_next().await.unwrap().is_none());
	}

	#[tokio::test]
	async fn queue_result_lands_on_in_progress_row() {
		let repo = test_repo().await;
		repo.insert(item("h1")).await.unwrap();
		repo.mark_in_progress("h1").await.unwrap();

		// The in-progress sentinel carries the partial marker, so the first
		// queue-originated result is accepted.
		let outcome = repo.report_result("h1", "hello world", true).await.unwrap();
		assert_eq!(outcome, UpdateOutcome::Applied);
		assert_eq!(repo.find_by_hash("h1").await.unwrap().unwrap().transcript, "hello world");
	}

	#[tokio::test]
	async fn queue_result_cannot_replace_finished_transcript() {
		let repo = test_repo().await;
		repo.insert(item("h1")).await.unwrap();
		repo.report_result("h1", "final text", false).await.unwrap();

		let outcome = repo.report_result("h1", "late duplicate", true).await.unwrap();
		assert_eq!(outcome, UpdateOutcome::Guarded);
		assert_eq!(repo.find_by_hash("h1").await.unwrap().unwrap().transcript, "final text");
	}

	#[tokio::test]
	async fn direct_result_replaces_finished_transcript() {
		let repo = test_repo().await;
		repo.insert(item("h1")).await.unwrap();
		repo.report_result("h1", "first pass", false).await.unwrap();

		let outcome = repo.report_result("h1", "corrected text", false).await.unwrap();
		assert_eq!(outcome, UpdateOutcome::Applied);
		assert_eq!(repo.find_by_hash("h1").await.unwrap().unwrap().transcript, "corrected text");
	}

	#[tokio::test]
	async fn queue_result_may_refine_partial_transcript() {
		let repo = test_repo().await;
		repo.insert(item("h1")).await.unwrap();
		repo.report_result("h1", "draft *** missing tail", false).await.unwrap();

		let outcome = repo.report_result("h1", "draft with the full tail", true).await.unwrap();
		assert_eq!(outcome, UpdateOutcome::Applied);
	}

	#[tokio::test]
	async fn identical_text_is_not_rewritten() {
		let repo = test_repo().await;
		repo.insert(item("h1")).await.unwrap();
		repo.report_result("h1", "same", false).await.unwrap();

		let outcome = repo.report_result("h1", "same", false).await.unwrap();
		assert_eq!(outcome, UpdateOutcome::Unchanged);
	}

	#[tokio::test]
	async fn updates_on_unknown_hash_are_noops() {
		let repo = test_repo().await;

		assert!(!repo.mark_in_progress("ghost").await.unwrap());
		let outcome = repo.report_result("ghost", "text", false).await.unwrap();
		assert_eq!(outcome, UpdateOutcome::NotFound);
	}

	#[tokio::test]
	async fn oversized_transcript_is_rejected() {
		let repo = test_repo().await;
		repo.insert(item("h1")).await.unwrap();

		let oversized = "x".repeat(MAX_TRANSCRIPT_LEN + 1);
		let err = repo.report_result("h1", &oversized, false).await.unwrap_err();
		assert!(matches!(err, QueueError::TranscriptTooLong { .. }));
	}

	#[tokio::test]
	async fn depth_counts_track_state_transitions() {
		let repo = test_repo().await;
		repo.insert(item("h1")).await.unwrap();
		repo.insert(item("h2")).await.unwrap();
		repo.insert(item("h3")).await.unwrap();
		repo.mark_in_progress("h2").await.unwrap();
		repo.report_result("h3", "finished", false).await.unwrap();

		let depth = repo.count_by_state().await.unwrap();
		assert_eq!(depth, QueueDepth { not_started: 1, in_progress: 1, done: 1 });
	}
}
