use std::sync::Arc;

use crate::{
	Error, Result, Transport,
	backoff::{Jitter, RandomJitter, RetryPolicy},
	budget::{Clock, CostModel, SystemClock, TokenBucket},
};
use sdh_domain::InvocationUnit;

/// Quota-governed access to the generation service.
///
/// Every unit is charged against the token bucket once, before the first attempt. Quota
/// rejections are retried with jittered exponential backoff; any other failure is returned
/// as is.
pub struct BudgetedClient<T> {
	transport: T,
	bucket: TokenBucket,
	cost: CostModel,
	retry: RetryPolicy,
	clock: Arc<dyn Clock>,
	jitter: Arc<dyn Jitter>,
}
impl<T> BudgetedClient<T>
where
	T: Transport,
{
	pub fn new(transport: T, cfg: &sdh_config::Llm) -> Self {
		Self {
			transport,
			bucket: TokenBucket::from_config(&cfg.budget),
			cost: CostModel::from_config(&cfg.budget),
			retry: RetryPolicy::from_config(&cfg.retry),
			clock: Arc::new(SystemClock),
			jitter: Arc::new(RandomJitter),
		}
	}

	pub fn with_parts(
		transport: T,
		bucket: TokenBucket,
		cost: CostModel,
		retry: RetryPolicy,
		clock: Arc<dyn Clock>,
		jitter: Arc<dyn Jitter>,
	) -> Self {
		Self { transport, bucket, cost, retry, clock, jitter }
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	pub async fn invoke(&self, unit: &InvocationUnit) -> Result<String> {
		let units = self.cost.estimate(unit);

		if units > self.bucket.capacity() {
			tracing::warn!(
				units,
				capacity = self.bucket.capacity(),
				"Invocation exceeds the budget capacity; charging the full capacity."
			);
		}

		let waited = self.bucket.acquire(units, self.clock.as_ref()).await;

		tracing::debug!(
			units,
			segments = unit.segments().len(),
			wait_ms = waited.as_millis() as u64,
			"Budget acquired."
		);

		let mut last_quota_error = None;

		for attempt in 0..self.retry.max_attempts {
			let err = match self.transport.send(unit).await {
				Ok(text) => return Ok(text),
				Err(err) if err.is_quota() => err,
				Err(err) => return Err(err),
			};

			if attempt + 1 < self.retry.max_attempts {
				let delay = self.retry.delay(attempt, self.jitter.as_ref());

				tracing::warn!(
					error = %err,
					attempt = attempt + 1,
					max_attempts = self.retry.max_attempts,
					delay_ms = delay.as_millis() as u64,
					"Generation service rejected the request for quota; backing off."
				);

				self.clock.sleep(delay).await;
			}

			last_quota_error = Some(err);
		}

		let Some(source) = last_quota_error else {
			return Err(Error::InvalidConfig {
				message: "Retry policy must allow at least one attempt.".to_string(),
			});
		};

		Err(Error::QuotaExhausted { attempts: self.retry.max_attempts, source: Box::new(source) })
	}
}
