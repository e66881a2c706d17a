use std::{
	sync::Mutex,
	time::{Duration, Instant},
};

use crate::BoxFuture;
use sdh_domain::InvocationUnit;

/// Monotonic time source for budget waits and backoff sleeps.
pub trait Clock
where
	Self: Send + Sync,
{
	fn now(&self) -> Instant;

	fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> Instant {
		Instant::now()
	}

	fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()> {
		Box::pin(tokio::time::sleep(duration))
	}
}

/// Estimates the consumption units of a unit from its text length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
	pub base_units_per_segment: u32,
	pub chars_per_unit: f64,
}
impl CostModel {
	pub fn from_config(cfg: &sdh_config::LlmBudget) -> Self {
		Self {
			base_units_per_segment: cfg.base_units_per_segment,
			chars_per_unit: cfg.chars_per_unit,
		}
	}

	pub fn estimate(&self, unit: &InvocationUnit) -> u32 {
		unit.non_empty_segments().map(|segment| self.segment_cost(segment)).sum()
	}

	fn segment_cost(&self, segment: &str) -> u32 {
		let chars = segment.chars().count() as f64;
		let length_units = (chars / self.chars_per_unit).ceil() as u32;

		self.base_units_per_segment.saturating_add(length_units)
	}
}

/// Replenishing budget of consumption units.
///
/// Acquisition reserves immediately and lets the balance go negative; the caller then waits
/// until the refill has covered the deficit. Reservations are therefore served in the order
/// they were made.
#[derive(Debug)]
pub struct TokenBucket {
	capacity: f64,
	refill_per_sec: f64,
	state: Mutex<BucketState>,
}

#[derive(Debug)]
struct BucketState {
	available: f64,
	updated_at: Option<Instant>,
}

impl TokenBucket {
	pub fn new(capacity: u32, refill_per_sec: f64) -> Self {
		let capacity = f64::from(capacity.max(1));

		Self {
			capacity,
			refill_per_sec: refill_per_sec.max(f64::MIN_POSITIVE),
			state: Mutex::new(BucketState { available: capacity, updated_at: None }),
		}
	}

	pub fn from_config(cfg: &sdh_config::LlmBudget) -> Self {
		Self::new(cfg.burst_units, f64::from(cfg.units_per_minute) / 60.0)
	}

	pub fn capacity(&self) -> u32 {
		self.capacity as u32
	}

	/// Reserves `units` at `now` and returns how long the caller must wait before using them.
	///
	/// Requests larger than the capacity are charged at the capacity.
	pub fn reserve(&self, units: u32, now: Instant) -> Duration {
		let mut state = self.state.lock().unwrap_or_else(|err| err.into_inner());

		if let Some(updated_at) = state.updated_at {
			let elapsed = now.saturating_duration_since(updated_at).as_secs_f64();

			state.available = (state.available + elapsed * self.refill_per_sec).min(self.capacity);
		}
		if state.updated_at.is_none_or(|updated_at| now > updated_at) {
			state.updated_at = Some(now);
		}

		state.available -= f64::from(units).min(self.capacity);

		if state.available >= 0.0 {
			return Duration::ZERO;
		}

		Duration::from_secs_f64(-state.available / self.refill_per_sec)
	}

	/// Blocks the calling sequence until `units` are available. Not cancellable once started.
	pub async fn acquire(&self, units: u32, clock: &dyn Clock) -> Duration {
		let wait = self.reserve(units, clock.now());

		if !wait.is_zero() {
			clock.sleep(wait).await;
		}

		wait
	}
}
