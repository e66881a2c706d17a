pub mod anthropic;
pub mod backoff;
pub mod budget;
pub mod client;
pub mod github;

mod error;

pub use anthropic::AnthropicTransport;
pub use backoff::{FixedJitter, Jitter, RandomJitter, RetryPolicy};
pub use budget::{Clock, CostModel, SystemClock, TokenBucket};
pub use client::BudgetedClient;
pub use error::{Error, Result};
pub use github::GitHubClient;

use std::{future::Future, pin::Pin};

use sdh_domain::InvocationUnit;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One request/response exchange with the generation service, without budgeting or retries.
pub trait Transport
where
	Self: Send + Sync,
{
	fn send<'a>(&'a self, unit: &'a InvocationUnit) -> BoxFuture<'a, Result<String>>;
}
