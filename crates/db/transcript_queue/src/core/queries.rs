use crate::core::model::{NewQueueItem, QueueItem, NOT_STARTED};
use sqlx::SqlitePool;

const ITEM_COLUMNS: &str = "id, metas, transcript, model_config, hash";

pub async fn fetch_by_hash(pool: &SqlitePool, hash: &str) -> Result<Option<QueueItem>, sqlx::Error> {
	sqlx::query_as::<_, QueueItem>(&format!("SELECT {ITEM_COLUMNS} FROM transcription_queue WHERE hash = ?"))
		.bind(hash)
		.fetch_optional(pool)
		.await
}

/// Set-semantics lookup, result order is unspecified.
pub async fn fetch_by_hashes(pool: &SqlitePool, hashes: &[&str]) -> Result<Vec<QueueItem>, sqlx::Error> {
	if hashes.is_empty() {
		return Ok(vec![]);
	}

	let placeholders = hashes.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
	let sql = format!("SELECT {ITEM_COLUMNS} FROM transcription_queue WHERE hash IN ({placeholders})");

	let mut query = sqlx::query_as::<_, QueueItem>(&sql);
	for hash in hashes {
		query = query.bind(*hash);
	}
	query.fetch_all(pool).await
}

/// `ON CONFLICT DO NOTHING` keeps the hash-uniqueness invariant without a
/// check-then-insert window. Returns whether a row was actually created.
pub async fn insert_item(pool: &SqlitePool, item: &NewQueueItem) -> Result<bool, sqlx::Error> {
	let result = sqlx::query(
		r#"
        INSERT INTO transcription_queue (metas, transcript, model_config, hash)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(hash) DO NOTHING
        "#,
	)
	.bind(&item.metas)
	.bind(NOT_STARTED)
	.bind(&item.model_config)
	.bind(&item.hash)
	.execute(pool)
	.await?;

	Ok(result.rows_affected() > 0)
}

/// Atomically transitions the oldest row in `from` state to `to` and returns
/// it. The subquery plus `RETURNING` leaves no window for two workers to
/// observe the same not-started row.
pub async fn claim_oldest(pool: &SqlitePool, from: &str, to: &str) -> Result<Option<QueueItem>, sqlx::Error> {
	sqlx::query_as::<_, QueueItem>(&format!(
		r#"
        UPDATE transcription_queue
        SET transcript = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = (SELECT id FROM transcription_queue WHERE transcript = ? ORDER BY id LIMIT 1)
        RETURNING {ITEM_COLUMNS}
        "#
	))
	.bind(to)
	.bind(from)
	.fetch_optional(pool)
	.await
}

/// Uniformly random row in the given state. Racing workers on stalled items
/// is deliberate: crude self-healing when a worker dies mid-task.
pub async fn pick_random_in_state(pool: &SqlitePool, state: &str) -> Result<Option<QueueItem>, sqlx::Error> {
	sqlx::query_as::<_, QueueItem>(&format!(
		"SELECT {ITEM_COLUMNS} FROM transcription_queue WHERE transcript = ? ORDER BY RANDOM() LIMIT 1"
	))
	.bind(state)
	.fetch_optional(pool)
	.await
}

/// Unconditional transcript write. Returns affected row count (0 when the
/// hash is unknown).
pub async fn set_transcript(pool: &SqlitePool, hash: &str, transcript: &str) -> Result<u64, sqlx::Error> {
	let result = sqlx::query("UPDATE transcription_queue SET transcript = ?, updated_at = CURRENT_TIMESTAMP WHERE hash = ?")
		.bind(transcript)
		.bind(hash)
		.execute(pool)
		.await?;

	Ok(result.rows_affected())
}

/// Guarded transcript write in one statement: skips identical text, and when
/// `from_queue` holds, only rows still carrying the partial marker accept the
/// update. Single-statement form keeps the guard atomic under racing writers.
pub async fn set_transcript_guarded(pool: &SqlitePool, hash: &str, transcript: &str, from_queue: bool, marker: &str) -> Result<u64, sqlx::Error> {
	let result = sqlx::query(
		r#"
        UPDATE transcription_queue
        SET transcript = ?, updated_at = CURRENT_TIMESTAMP
        WHERE hash = ? AND transcript <> ? AND (? = 0 OR instr(transcript, ?) > 0)
        "#,
	)
	.bind(transcript)
	.bind(hash)
	.bind(transcript)
	.bind(i64::from(from_queue))
	.bind(marker)
	.execute(pool)
	.await?;

	Ok(result.rows_affected())
}

pub async fn count_in_state(pool: &SqlitePool, state: &str) -> Result<i64, sqlx::Error> {
	let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transcription_queue WHERE transcript = ?")
		.bind(state)
		.fetch_one(pool)
		.await?;
	Ok(count)
}

pub async fn count_all(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
	let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transcription_queue").fetch_one(pool).await?;
	Ok(count)
}
