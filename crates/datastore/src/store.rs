use crate::error::DataStoreError;
use crate::metas::derive_metas;
use blob_store::BlobStore;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use transcript_queue::{NewQueueItem, QueueDepth, QueueItem, QueueRepository, UpdateOutcome};

/// Model variant tag stamped on every newly ingested item.
pub const DEFAULT_MODEL_CONFIG: &str = "large";

/// Per-batch ingestion counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
	pub ingested: usize,
	pub deduplicated: usize,
}

/// Process-wide context object owning the queue repository and the blob
/// store. Built once at startup and shared by reference; there are no
/// module-level singletons behind it.
pub struct DataStore {
	queue: QueueRepository,
	blobs: BlobStore,
}

impl DataStore {
	pub fn new(queue: QueueRepository, blobs: BlobStore) -> Self {
		Self { queue, blobs }
	}

	pub fn queue(&self) -> &QueueRepository {
		&self.queue
	}

	pub fn blobs(&self) -> &BlobStore {
		&self.blobs
	}

	/// Makes a batch durable and queued, once per unique hash.
	///
	/// The blob write lands before the row insert; a crash in between leaves
	/// an orphaned blob and a retried ingest heals it. Storage is therefore
	/// at-least-once, never lossy.
	pub async fn ingest(&self, audio_batch: Vec<Bytes>, hashes: Vec<String>, times_list: Vec<HashMap<String, f64>>) -> Result<IngestReport, DataStoreError> {
		if audio_batch.len() != hashes.len() || hashes.len() != times_list.len() {
			return Err(DataStoreError::BatchShape {
				audio: audio_batch.len(),
				hashes: hashes.len(),
				times: times_list.len(),
			});
		}

		let mut report = IngestReport::default();

		for ((audio, hash), times) in audio_batch.into_iter().zip(hashes).zip(times_list) {
			if self.queue.find_by_hash(&hash).await?.is_some() {
				report.deduplicated += 1;
				continue;
			}

			let metas = derive_metas(&times);
			if metas.is_none() && !times.is_empty() {
				tracing::debug!(hash = %hash, "no task mapping matched, item carries no timing metadata");
			}

			self.blobs.put(&hash, audio).await?;

			let inserted = self
				.queue
				.insert(NewQueueItem {
					hash: hash.clone(),
					metas,
					model_config: DEFAULT_MODEL_CONFIG.to_string(),
				})
				.await?;

			if inserted {
				tracing::info!(hash = %hash, "queued new audio item");
				report.ingested += 1;
			} else {
				// A concurrent ingest of the same hash won the insert
				report.deduplicated += 1;
			}
		}

		Ok(report)
	}

	pub async fn get_by_hash(&self, hash: &str) -> Result<Option<QueueItem>, DataStoreError> {
		Ok(self.queue.find_by_hash(hash).await?)
	}

	pub async fn get_by_hash_batch(&self, csv_hashes: &str) -> Result<Vec<QueueItem>, DataStoreError> {
		Ok(self.queue.find_by_hash_batch(csv_hashes).await?)
	}

	pub async fn claim_next(&self) -> Result<Option<QueueItem>, DataStoreError> {
		Ok(self.queue.claim_next().await?)
	}

	pub async fn mark_in_progress(&self, hash: &str) -> Result<bool, DataStoreError> {
		Ok(self.queue.mark_in_progress(hash).await?)
	}

	pub async fn report_result(&self, hash: &str, transcript: &str, from_queue: bool) -> Result<UpdateOutcome, DataStoreError> {
		Ok(self.queue.report_result(hash, transcript, from_queue).await?)
	}

	pub async fn queue_depth(&self) -> Result<QueueDepth, DataStoreError> {
		Ok(self.queue.count_by_state().await?)
	}

	pub async fn get_blob(&self, hash: &str) -> Result<Bytes, DataStoreError> {
		Ok(self.blobs.get(hash).await?)
	}

	pub async fn put_blob(&self, hash: &str, data: Bytes) -> Result<(), DataStoreError> {
		Ok(self.blobs.put(hash, data).await?)
	}

	pub async fn remove_blob(&self, hash: &str) -> Result<(), DataStoreError> {
		Ok(self.blobs.remove(hash).await?)
	}
}
