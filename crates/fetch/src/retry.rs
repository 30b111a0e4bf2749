use std::time::Duration;

use crate::error::{FetchError, Result};
use crate::source::{CatalogSource, FetchedCatalog};

/// Bounded retry with linear backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
	/// Total attempts, including the first. Zero is treated as one.
	pub max_attempts: u32,
	pub backoff: Duration,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			max_attempts: 3,
			backoff: Duration::from_millis(500),
		}
	}
}

impl RetryPolicy {
	/// Delay before retry number `retry` (1 for the first retry).
	pub fn delay(&self, retry: u32) -> Duration {
		self.backoff.saturating_mul(retry)
	}

	fn attempts(&self) -> u32 {
		self.max_attempts.max(1)
	}
}

/// Fetches `locale`, retrying every failure until the policy is exhausted.
pub async fn fetch_with_retry(source: &dyn CatalogSource, locale: &str, policy: RetryPolicy) -> Result<FetchedCatalog> {
	let attempts = policy.attempts();
	let mut attempt = 1;
	loop {
		match source.fetch(locale).await {
			Ok(catalog) => {
				tracing::debug!(locale, attempt, id = %catalog.id, "fetch.ok");
				return Ok(catalog);
			}
			Err(error) if attempt < attempts => {
				let delay = policy.delay(attempt);
				tracing::warn!(locale, attempt, max_attempts = attempts, ?delay, %error, "fetch.retry");
				tokio::time::sleep(delay).await;
				attempt += 1;
			}
			Err(error) => {
				tracing::error!(locale, attempts, %error, "fetch.exhausted");
				return Err(FetchError::Exhausted {
					locale: locale.to_owned(),
					attempts,
					last: Box::new(error),
				});
			}
		}
	}
}
