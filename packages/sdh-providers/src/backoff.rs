use std::time::Duration;

use uuid::Uuid;

pub const JITTER_MIN: f64 = 0.8;
pub const JITTER_MAX: f64 = 1.2;

const MAX_EXPONENT: u32 = 30;

/// Source of the multiplicative jitter applied to backoff delays.
pub trait Jitter
where
	Self: Send + Sync,
{
	/// A factor in `[JITTER_MIN, JITTER_MAX]`.
	fn factor(&self) -> f64;
}

/// Uniform jitter drawn from the random bits of a v4 UUID.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomJitter;
impl Jitter for RandomJitter {
	fn factor(&self) -> f64 {
		// The top 48 bits of a v4 UUID are all random.
		let bits = (Uuid::new_v4().as_u128() >> 80) as u64;
		let sample = bits as f64 / (1_u64 << 48) as f64;

		JITTER_MIN + (JITTER_MAX - JITTER_MIN) * sample
	}
}

#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);
impl Jitter for FixedJitter {
	fn factor(&self) -> f64 {
		self.0.clamp(JITTER_MIN, JITTER_MAX)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
	pub max_attempts: u32,
	pub base_backoff: Duration,
}
impl RetryPolicy {
	pub fn from_config(cfg: &sdh_config::LlmRetry) -> Self {
		Self {
			max_attempts: cfg.max_attempts.max(1),
			base_backoff: Duration::from_millis(cfg.base_backoff_ms),
		}
	}

	/// `base_backoff * 2^attempt`, scaled by the jitter factor and saturating at `Duration::MAX`.
	pub fn delay(&self, attempt: u32, jitter: &dyn Jitter) -> Duration {
		let factor = jitter.factor().clamp(JITTER_MIN, JITTER_MAX);
		let nominal = self.base_backoff.as_secs_f64() * 2_f64.powi(attempt.min(MAX_EXPONENT) as i32);

		Duration::try_from_secs_f64(nominal * factor).unwrap_or(Duration::MAX)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn policy() -> RetryPolicy {
		RetryPolicy { max_attempts: 5, base_backoff: Duration::from_secs(15) }
	}

	#[test]
	fn fixed_jitter_gives_exact_delays() {
		let policy = policy();
		let jitter = FixedJitter(1.0);

		assert_eq!(policy.delay(0, &jitter), Duration::from_secs(15));
		assert_eq!(policy.delay(1, &jitter), Duration::from_secs(30));
		assert_eq!(policy.delay(3, &jitter), Duration::from_secs(120));
	}

	#[test]
	fn delays_stay_inside_jitter_band() {
		let policy = policy();

		for attempt in 0..6 {
			let nominal = policy.base_backoff.as_secs_f64() * 2_f64.powi(attempt as i32);

			for _ in 0..200 {
				let delay = policy.delay(attempt, &RandomJitter).as_secs_f64();

				assert!(delay >= nominal * JITTER_MIN - 1e-6, "attempt {attempt}: {delay}");
				assert!(delay <= nominal * JITTER_MAX + 1e-6, "attempt {attempt}: {delay}");
			}
		}
	}

	#[test]
	fn band_edges_never_overlap_between_attempts() {
		let policy = policy();
		let low = FixedJitter(JITTER_MIN);
		let high = FixedJitter(JITTER_MAX);

		for attempt in 0..6 {
			assert!(policy.delay(attempt, &high) < policy.delay(attempt + 1, &low));
		}
	}

	#[test]
	fn overflowing_delay_saturates() {
		let policy = RetryPolicy { max_attempts: 5, base_backoff: Duration::MAX };

		assert_eq!(policy.delay(30, &FixedJitter(1.2)), Duration::MAX);
	}

	#[test]
	fn out_of_band_factors_are_clamped() {
		let policy = policy();

		assert_eq!(policy.delay(0, &FixedJitter(5.0)), Duration::from_secs(18));
		assert_eq!(policy.delay(0, &FixedJitter(0.0)), Duration::from_secs(12));
	}
}
