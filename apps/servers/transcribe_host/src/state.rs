use crate::config::Config;
use anyhow::Result;
use blob_store::{BlobBackend, BlobStore, HttpBackend, LocalFsBackend, RetryPolicy};
use datastore::DataStore;
use std::sync::Arc;
use std::time::Duration;
use transcript_queue::QueueRepository;

#[derive(Clone)]
pub struct AppState {
	pub config: Arc<Config>,
	pub datastore: Arc<DataStore>,
}

impl AppState {
	pub async fn build(config: Arc<Config>) -> Result<Self> {
		let queue = QueueRepository::connect(&config.database_url).await?;
		queue.init_schema().await?;

		let backend: Arc<dyn BlobBackend> = match &config.remote_url {
			Some(url) => {
				tracing::info!(url = %url, "using remote blob backend");
				Arc::new(HttpBackend::new(url.clone(), config.remote_user.clone(), config.remote_password.clone()))
			}
			None => {
				tracing::info!(root = %config.blob_root, "using local blob backend");
				Arc::new(LocalFsBackend::new(config.blob_root.clone()).await?)
			}
		};

		let retry = RetryPolicy::new(config.blob_retry_attempts, Duration::from_millis(config.blob_retry_base_ms));
		let blobs = BlobStore::new(backend, config.cache_capacity, retry);

		Ok(Self {
			config,
			datastore: Arc::new(DataStore::new(queue, blobs)),
		})
	}
}
