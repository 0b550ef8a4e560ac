use clap::Parser;
use std::net::SocketAddr;

#[derive(Parser, Debug, Clone)]
#[command(name = "transcribe_host")]
#[command(about = "Hash-addressed transcription work queue host", long_about = None)]
pub struct Config {
	/// SQLite connection string for the queue table
	#[arg(long, env = "DATABASE_URL", default_value = "sqlite://transcribe_queue.db")]
	pub database_url: String,

	/// Root directory for the local blob namespace
	#[arg(long, env = "BLOB_ROOT", default_value = ".")]
	pub blob_root: String,

	/// Remote blob host base URL; unset means local filesystem storage
	#[arg(long, env = "REMOTE_URL")]
	pub remote_url: Option<String>,

	#[arg(long, env = "REMOTE_USER")]
	pub remote_user: Option<String>,

	#[arg(long, env = "REMOTE_PASSWORD")]
	pub remote_password: Option<String>,

	/// Blob read cache capacity, in entries
	#[arg(long, env = "CACHE_CAPACITY", default_value = "128")]
	pub cache_capacity: u64,

	/// Total blob write attempts before a terminal failure is surfaced
	#[arg(long, env = "BLOB_RETRY_ATTEMPTS", default_value = "5")]
	pub blob_retry_attempts: usize,

	#[arg(long, env = "BLOB_RETRY_BASE_MS", default_value = "250")]
	pub blob_retry_base_ms: u64,

	#[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
	pub bind_addr: String,

	/// Request body limit in megabytes
	#[arg(long, env = "MAX_REQUEST_MB", default_value = "64")]
	pub max_request_mb: usize,

	#[arg(long, env = "REQUEST_TIMEOUT_MS", default_value = "30000")]
	pub request_timeout_ms: u64,

	#[arg(long, env = "RUST_LOG")]
	pub rust_log: Option<String>,

	#[arg(long, env = "LOG_JSON", default_value_t = false)]
	pub log_json: bool,
}

impl Config {
	/// Malformed configuration stops the process here, not at first use.
	pub fn validate(&self) -> Result<(), String> {
		if self.blob_retry_attempts == 0 {
			return Err("blob_retry_attempts must be at least 1".to_string());
		}

		if self.cache_capacity == 0 {
			return Err("cache_capacity must be greater than 0".to_string());
		}

		if self.max_request_mb == 0 {
			return Err("max_request_mb must be greater than 0".to_string());
		}

		if self.request_timeout_ms == 0 {
			return Err("request_timeout_ms must be greater than 0".to_string());
		}

		if self.bind_addr.parse::<SocketAddr>().is_err() {
			return Err(format!("bind_addr {:?} is not a valid socket address", self.bind_addr));
		}

		match (&self.remote_url, &self.remote_user, &self.remote_password) {
			(None, None, None) => {}
			(None, _, _) => return Err("remote credentials set without remote_url".to_string()),
			(Some(url), _, _) if !url.starts_with("http://") && !url.starts_with("https://") => {
				return Err(format!("remote_url must be an http(s) URL, got {url:?}"));
			}
			(Some(_), None, Some(_)) => return Err("remote_password set without remote_user".to_string()),
			(Some(_), _, _) => {}
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config(args: &[&str]) -> Config {
		let argv: Vec<&str> = std::iter::once("transcribe_host").chain(args.iter().copied()).collect();
		Config::try_parse_from(argv).unwrap()
	}

	#[test]
	fn defaults_validate() {
		assert!(config(&[]).validate().is_ok());
	}

	#[test]
	fn zero_retry_budget_is_rejected() {
		assert!(config(&["--blob-retry-attempts", "0"]).validate().is_err());
	}

	#[test]
	fn partial_remote_credentials_are_rejected() {
		assert!(config(&["--remote-user", "worker"]).validate().is_err());
		assert!(config(&["--remote-url", "http://blobs.internal", "--remote-password", "secret"]).validate().is_err());
	}

	#[test]
	fn remote_url_scheme_is_checked() {
		assert!(config(&["--remote-url", "ftp://blobs.internal"]).validate().is_err());
		assert!(config(&["--remote-url", "http://blobs.internal", "--remote-user", "worker", "--remote-password", "secret"]).validate().is_ok());
	}

	#[test]
	fn bad_bind_addr_is_rejected() {
		assert!(config(&["--bind-addr", "not-an-addr"]).validate().is_err());
	}
}
