pub mod collect;
pub mod queries;
pub mod relevance;
pub mod report;
pub mod summarize;

mod error;

pub use error::{Error, Result};
pub use sdh_providers::BoxFuture;

use std::sync::Arc;

use time::{Duration, OffsetDateTime};

use sdh_config::Config;
use sdh_domain::{Comment, InvocationUnit, Ticket, TicketContent, prompts, rank_candidates};
use sdh_providers::{AnthropicTransport, BudgetedClient, GitHubClient, Transport};

/// Quota-governed text generation.
pub trait Generator
where
	Self: Send + Sync,
{
	fn invoke<'a>(&'a self, unit: &'a InvocationUnit) -> BoxFuture<'a, Result<String>>;
}

/// Read and comment access to the issue tracker.
pub trait Tracker
where
	Self: Send + Sync,
{
	fn fetch_ticket<'a>(
		&'a self,
		owner: &'a str,
		repo: &'a str,
		number: u64,
	) -> BoxFuture<'a, Result<Ticket>>;

	fn fetch_comments<'a>(
		&'a self,
		owner: &'a str,
		repo: &'a str,
		ticket: &'a Ticket,
	) -> BoxFuture<'a, Result<Vec<Comment>>>;

	/// Closed issues of `owner/repo` matching `query`.
	fn search<'a>(
		&'a self,
		owner: &'a str,
		repo: &'a str,
		query: &'a str,
	) -> BoxFuture<'a, Result<Vec<Ticket>>>;

	fn post_comment<'a>(
		&'a self,
		owner: &'a str,
		repo: &'a str,
		number: u64,
		body: &'a str,
	) -> BoxFuture<'a, Result<()>>;
}

#[derive(Clone)]
pub struct Providers {
	pub generator: Arc<dyn Generator>,
	pub tracker: Arc<dyn Tracker>,
}
impl Providers {
	pub fn new(generator: Arc<dyn Generator>, tracker: Arc<dyn Tracker>) -> Self {
		Self { generator, tracker }
	}

	/// Anthropic behind the budgeted client, and the GitHub REST API.
	pub fn from_config(cfg: &Config) -> Result<Self> {
		let transport = AnthropicTransport::new(&cfg.llm)
			.map_err(provider_error)?
			.with_system(prompts::SDH_CONTEXT);
		let generator = BudgetedClient::new(transport, &cfg.llm);
		let tracker = GitHubClient::new(&cfg.github).map_err(tracker_error)?;

		Ok(Self::new(Arc::new(generator), Arc::new(tracker)))
	}
}

pub struct SdhService {
	pub cfg: Config,
	pub providers: Providers,
}
impl SdhService {
	pub fn new(cfg: Config, providers: Providers) -> Self {
		Self { cfg, providers }
	}

	/// Runs the whole pipeline for one ticket and returns the report text.
	pub async fn process_ticket(&self, number: u64) -> Result<String> {
		self.process_ticket_at(number, OffsetDateTime::now_utc()).await
	}

	/// Same as [`Self::process_ticket`], with `now` as the reference time for recency scoring.
	pub async fn process_ticket_at(&self, number: u64, now: OffsetDateTime) -> Result<String> {
		tracing::info!(ticket = number, "Processing ticket.");

		let main = self.fetch_main(number).await?;
		let summary = self.summarize(&main).await?;
		let queries = self.synthesize_queries(&summary).await;
		let candidates = self.collect_candidates(&main.ticket, &queries).await;
		let window = Duration::days(self.cfg.pipeline.recency_days);
		let ranked = rank_candidates(&main.ticket, candidates, now, window);
		let results = self.filter_relevant(&main.ticket, &summary, ranked).await;

		tracing::info!(ticket = number, findings = results.len(), "Relevance analysis finished.");

		self.synthesize_report(number, &summary, &results).await
	}

	pub async fn post_report(&self, number: u64, report: &str) -> Result<()> {
		let github = &self.cfg.github;

		self.providers
			.tracker
			.post_comment(&github.owner, &github.repo, number, report)
			.await
			.map_err(|err| Error::PostComment { ticket: number, message: err.to_string() })?;

		tracing::info!(ticket = number, "Report posted.");

		Ok(())
	}

	async fn fetch_main(&self, number: u64) -> Result<TicketContent> {
		let github = &self.cfg.github;
		let tracker = &self.providers.tracker;
		let fatal = |err: Error| Error::FetchTicket { ticket: number, message: err.to_string() };
		let ticket = tracker.fetch_ticket(&github.owner, &github.repo, number).await.map_err(fatal)?;
		let comments =
			tracker.fetch_comments(&github.owner, &github.repo, &ticket).await.map_err(fatal)?;

		tracing::info!(ticket = number, comments = comments.len(), "Fetched ticket.");

		Ok(TicketContent::new(ticket, comments))
	}
}

impl<T> Generator for BudgetedClient<T>
where
	T: Transport,
{
	fn invoke<'a>(&'a self, unit: &'a InvocationUnit) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { BudgetedClient::invoke(self, unit).await.map_err(provider_error) })
	}
}

impl Tracker for GitHubClient {
	fn fetch_ticket<'a>(
		&'a self,
		owner: &'a str,
		repo: &'a str,
		number: u64,
	) -> BoxFuture<'a, Result<Ticket>> {
		Box::pin(async move {
			GitHubClient::fetch_ticket(self, owner, repo, number).await.map_err(tracker_error)
		})
	}

	fn fetch_comments<'a>(
		&'a self,
		owner: &'a str,
		repo: &'a str,
		ticket: &'a Ticket,
	) -> BoxFuture<'a, Result<Vec<Comment>>> {
		Box::pin(async move {
			GitHubClient::fetch_comments(self, owner, repo, ticket).await.map_err(tracker_error)
		})
	}

	fn search<'a>(
		&'a self,
		owner: &'a str,
		repo: &'a str,
		query: &'a str,
	) -> BoxFuture<'a, Result<Vec<Ticket>>> {
		Box::pin(async move {
			GitHubClient::search(self, owner, repo, query).await.map_err(tracker_error)
		})
	}

	fn post_comment<'a>(
		&'a self,
		owner: &'a str,
		repo: &'a str,
		number: u64,
		body: &'a str,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			GitHubClient::post_comment(self, owner, repo, number, body)
				.await
				.map_err(tracker_error)
		})
	}
}

fn provider_error(err: sdh_providers::Error) -> Error {
	Error::Provider { message: err.to_string() }
}

fn tracker_error(err: sdh_providers::Error) -> Error {
	Error::Tracker { message: err.to_string() }
}
