use crate::error::BlobError;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;

/// Durable byte storage addressed by content hash.
#[async_trait]
pub trait BlobBackend: Send + Sync {
	async fn put(&self, hash: &str, data: &[u8]) -> Result<(), BlobError>;
	async fn get(&self, hash: &str) -> Result<Bytes, BlobError>;
	async fn remove(&self, hash: &str) -> Result<(), BlobError>;
}

/// Hash strings double as storage keys; anything that could escape the blob
/// namespace is rejected before it reaches a backend.
pub(crate) fn validate_key(hash: &str) -> Result<(), BlobError> {
	if hash.is_empty() || !hash.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
		return Err(BlobError::InvalidKey(hash.to_string()));
	}
	Ok(())
}

/// Local filesystem backend, one file per hash under `<root>/data/`.
pub struct LocalFsBackend {
	root: PathBuf,
}

impl LocalFsBackend {
	/// Creates the `data/` namespace under `root` if missing.
	pub async fn new(root: impl Into<PathBuf>) -> Result<Self, BlobError> {
		let root = root.into().join("data");
		tokio::fs::create_dir_all(&root).await?;
		Ok(Self { root })
	}

	fn path_for(&self, hash: &str) -> PathBuf {
		self.root.join(hash)
	}
}

#[async_trait]
impl BlobBackend for LocalFsBackend {
	async fn put(&self, hash: &str, data: &[u8]) -> Result<(), BlobError> {
		validate_key(hash)?;
		tokio::fs::write(self.path_for(hash), data).await?;
		Ok(())
	}

	async fn get(&self, hash: &str) -> Result<Bytes, BlobError> {
		validate_key(hash)?;
		match tokio::fs::read(self.path_for(hash)).await {
			Ok(data) => Ok(Bytes::from(data)),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(BlobError::NotFound(hash.to_string())),
			Err(e) => Err(e.into()),
		}
	}

	async fn remove(&self, hash: &str) -> Result<(), BlobError> {
		validate_key(hash)?;
		match tokio::fs::remove_file(self.path_for(hash)).await {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(BlobError::NotFound(hash.to_string())),
			Err(e) => Err(e.into()),
		}
	}
}

/// Remote file-transfer backend speaking the blob surface of another
/// transcribe host: `PUT/GET/DELETE {base}/blobs/{hash}` with basic auth.
pub struct HttpBackend {
	client: reqwest::Client,
	base_url: String,
	user: Option<String>,
	password: Option<String>,
}

impl HttpBackend {
	pub fn new(base_url: impl Into<String>, user: Option<String>, password: Option<String>) -> Self {
		let base_url: String = base_url.into();
		Self {
			client: reqwest::Client::new(),
			base_url: base_url.trim_end_matches('/').to_string(),
			user,
			password,
		}
	}

	fn url_for(&self, hash: &str) -> String {
		format!("{}/blobs/{}", self.base_url, hash)
	}

	fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
		match &self.user {
			Some(user) => req.basic_auth(user, self.password.as_deref()),
			None => req,
		}
	}
}

#[async_trait]
impl BlobBackend for HttpBackend {
	async fn put(&self, hash: &str, data: &[u8]) -> Result<(), BlobError> {
		validate_key(hash)?;
		let response = self.authed(self.client.put(self.url_for(hash))).body(data.to_vec()).send().await?;
		if !response.status().is_success() {
			return Err(BlobError::RemoteStatus(response.status().as_u16()));
		}
		Ok(())
	}

	async fn get(&self, hash: &str) -> Result<Bytes, BlobError> {
		validate_key(hash)?;
		let response = self.authed(self.client.get(self.url_for(hash))).send().await?;
		if response.status() == reqwest::StatusCode::NOT_FOUND {
			return Err(BlobError::NotFound(hash.to_string()));
		}
		if !response.status().is_success() {
			return Err(BlobError::RemoteStatus(response.status().as_u16()));
		}
		Ok(response.bytes().await?)
	}

	async fn remove(&self, hash: &str) -> Result<(), BlobError> {
		validate_key(hash)?;
		let response = self.authed(self.client.delete(self.url_for(hash))).send().await?;
		if response.status() == reqwest::StatusCode::NOT_FOUND {
			return Err(BlobError::NotFound(hash.to_string()));
		}
		if !response.status().is_success() {
			return Err(BlobError::RemoteStatus(response.status().as_u16()));
		}
		Ok(())
	}
}
