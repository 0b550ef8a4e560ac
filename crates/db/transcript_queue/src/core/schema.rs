use sqlx::SqlitePool;

pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
	sqlx::query(
		r#"
        CREATE TABLE IF NOT EXISTS transcription_queue (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            metas TEXT,
            transcript TEXT NOT NULL,
            model_config TEXT NOT NULL,
            hash TEXT NOT NULL UNIQUE,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
	)
	.execute(pool)
	.await?;

	// Claim scans filter on the sentinel value
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_transcription_queue_transcript ON transcription_queue(transcript)")
		.execute(pool)
		.await?;

	Ok(())
}
