use std::{
	collections::VecDeque,
	sync::{
		Arc, Mutex,
		atomic::{AtomicUsize, Ordering},
	},
	time::{Duration, Instant},
};

use sdh_domain::InvocationUnit;
use sdh_providers::{
	BoxFuture, BudgetedClient, Clock, CostModel, Error, FixedJitter, Result, RetryPolicy,
	TokenBucket, Transport,
};

/// Clock whose sleeps return immediately and advance the reported time.
struct ManualClock {
	start: Instant,
	elapsed: Mutex<Duration>,
	sleeps: Mutex<Vec<Duration>>,
}
impl ManualClock {
	fn new() -> Self {
		Self {
			start: Instant::now(),
			elapsed: Mutex::new(Duration::ZERO),
			sleeps: Mutex::new(Vec::new()),
		}
	}

	fn sleeps(&self) -> Vec<Duration> {
		self.sleeps.lock().expect("sleeps lock failed").clone()
	}
}
impl Clock for ManualClock {
	fn now(&self) -> Instant {
		self.start + *self.elapsed.lock().expect("clock lock failed")
	}

	fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()> {
		*self.elapsed.lock().expect("clock lock failed") += duration;

		self.sleeps.lock().expect("sleeps lock failed").push(duration);

		Box::pin(async {})
	}
}

struct ScriptedTransport {
	calls: Arc<AtomicUsize>,
	script: Mutex<VecDeque<Result<String>>>,
}
impl ScriptedTransport {
	fn new(script: Vec<Result<String>>) -> Self {
		Self { calls: Arc::new(AtomicUsize::new(0)), script: Mutex::new(script.into()) }
	}

	fn count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl Transport for ScriptedTransport {
	fn send<'a>(&'a self, _unit: &'a InvocationUnit) -> BoxFuture<'a, Result<String>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let next = self
			.script
			.lock()
			.expect("script lock failed")
			.pop_front()
			.unwrap_or_else(|| Ok("default".to_string()));

		Box::pin(async move { next })
	}
}

fn quota() -> Result<String> {
	Err(Error::Status { status: 429, body: "rate_limit_error".to_string() })
}

fn cost_model() -> CostModel {
	CostModel { base_units_per_segment: 3, chars_per_unit: 4.0 }
}

fn client(
	script: Vec<Result<String>>,
	bucket: TokenBucket,
	max_attempts: u32,
	clock: Arc<ManualClock>,
) -> BudgetedClient<ScriptedTransport> {
	BudgetedClient::with_parts(
		ScriptedTransport::new(script),
		bucket,
		cost_model(),
		RetryPolicy { max_attempts, base_backoff: Duration::from_secs(1) },
		clock,
		Arc::new(FixedJitter(1.0)),
	)
}

#[tokio::test]
async fn retries_quota_rejections_with_exponential_backoff() {
	let clock = Arc::new(ManualClock::new());
	// "a" costs exactly the capacity, so a second charge would stall for ~4000 s.
	let bucket = TokenBucket::new(4, 0.001);
	let client = client(vec![quota(), quota(), Ok("done".to_string())], bucket, 5, clock.clone());
	let text = client.invoke(&InvocationUnit::new("a")).await.expect("invoke failed");

	assert_eq!(text, "done");
	assert_eq!(client.transport().count(), 3);
	assert_eq!(clock.sleeps(), vec![Duration::from_secs(1), Duration::from_secs(2)]);
}

#[tokio::test]
async fn non_quota_failure_is_not_retried() {
	let clock = Arc::new(ManualClock::new());
	let client = client(
		vec![Err(Error::Status { status: 500, body: "boom".to_string() })],
		TokenBucket::new(1_000, 100.0),
		5,
		clock.clone(),
	);
	let err = client.invoke(&InvocationUnit::new("a")).await.expect_err("expected failure");

	assert!(matches!(err, Error::Status { status: 500, .. }));
	assert_eq!(client.transport().count(), 1);
	assert!(clock.sleeps().is_empty());
}

#[tokio::test]
async fn exhausting_attempts_wraps_the_last_quota_error() {
	let clock = Arc::new(ManualClock::new());
	let script = vec![
		quota(),
		quota(),
		Err(Error::Api { kind: "rate_limit_error".to_string(), message: "last".to_string() }),
	];
	let client = client(script, TokenBucket::new(1_000, 100.0), 3, clock.clone());
	let err = client.invoke(&InvocationUnit::new("a")).await.expect_err("expected failure");
	let Error::QuotaExhausted { attempts, source } = err else {
		panic!("expected quota exhaustion");
	};

	assert_eq!(attempts, 3);
	assert!(matches!(*source, Error::Api { ref message, .. } if message == "last"));
	assert_eq!(client.transport().count(), 3);
	// No sleep after the final attempt.
	assert_eq!(clock.sleeps(), vec![Duration::from_secs(1), Duration::from_secs(2)]);
}

#[tokio::test]
async fn depleted_budget_delays_the_next_unit() {
	let clock = Arc::new(ManualClock::new());
	let client = client(Vec::new(), TokenBucket::new(10, 1.0), 5, clock.clone());
	// Each unit costs 3 + ceil(4 / 4) = 4 units.
	let unit = InvocationUnit::new("abcd");

	client.invoke(&unit).await.expect("first invoke failed");
	client.invoke(&unit).await.expect("second invoke failed");

	assert!(clock.sleeps().is_empty());

	client.invoke(&unit).await.expect("third invoke failed");

	assert_eq!(clock.sleeps(), vec![Duration::from_secs(2)]);
	assert_eq!(client.transport().count(), 3);
}
