use crate::backend::BlobBackend;
use crate::error::BlobError;
use crate::retry::{retry_async, RetryPolicy};
use bytes::Bytes;
use moka::future::Cache;
use std::sync::Arc;
use tracing::debug;

/// Content-addressed blob storage with a bounded read-through cache and a
/// bounded retry budget on writes.
pub struct BlobStore {
	backend: Arc<dyn BlobBackend>,
	cache: Cache<String, Bytes>,
	retry: RetryPolicy,
}

impl BlobStore {
	/// `cache_capacity` bounds the read cache by entry count.
	pub fn new(backend: Arc<dyn BlobBackend>, cache_capacity: u64, retry: RetryPolicy) -> Self {
		Self {
			backend,
			cache: Cache::builder().max_capacity(cache_capacity).build(),
			retry,
		}
	}

	/// Durable write. Transient backend failures are retried with backoff up
	/// to the configured budget, then surfaced as `RetryExhausted`.
	pub async fn put(&self, hash: &str, data: Bytes) -> Result<(), BlobError> {
		// A bad key never becomes valid, keep it out of the retry loop
		crate::backend::validate_key(hash)?;
		retry_async(self.retry, || self.backend.put(hash, &data))
			.await
			.map_err(|(attempts, source)| BlobError::RetryExhausted {
				attempts,
				source: Box::new(source),
			})
	}

	/// Read-through cache: repeated reads of hot blobs skip the backend.
	pub async fn get(&self, hash: &str) -> Result<Bytes, BlobError> {
		if let Some(data) = self.cache.get(hash).await {
			debug!(hash = %hash, "blob cache hit");
			return Ok(data);
		}

		let data = self.backend.get(hash).await?;
		self.cache.insert(hash.to_string(), data.clone()).await;
		Ok(data)
	}

	/// The cache entry goes first so no reader can observe deleted bytes.
	pub async fn remove(&self, hash: &str) -> Result<(), BlobError> {
		self.cache.invalidate(hash).await;
		self.backend.remove(hash).await
	}
}
