use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Bounded exponential backoff budget for blob writes.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
	/// Total number of tries, including the first one.
	pub max_attempts: usize,
	pub base_delay: Duration,
	pub factor: u32,
}

impl RetryPolicy {
	pub const fn new(max_attempts: usize, base_delay: Duration) -> Self {
		Self {
			max_attempts,
			base_delay,
			factor: 2,
		}
	}
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self::new(5, Duration::from_millis(250))
	}
}

/// Retry an async operation up to `policy.max_attempts` times with
/// exponential backoff.
///
/// Returns `Ok(T)` on success or `Err((attempts, E))` from the last attempt,
/// so the caller can surface a terminal failure with the attempt count.
pub async fn retry_async<F, Fut, T, E>(policy: RetryPolicy, mut operation: F) -> Result<T, (usize, E)>
where
	F: FnMut() -> Fut,
	Fut: std::future::Future<Output = Result<T, E>>,
	E: std::fmt::Display,
{
	let mut attempt = 0;

	loop {
		attempt += 1;
		match operation().await {
			Ok(result) => return Ok(result),
			Err(err) if attempt >= policy.max_attempts => return Err((attempt, err)),
			Err(err) => {
				let backoff = policy.base_delay * policy.factor.pow((attempt - 1) as u32);
				warn!(attempt, backoff_ms = backoff.as_millis() as u64, error = %err, "operation failed, backing off");
				sleep(backoff).await;
			}
		}
	}
}
