use crate::SdhService;
use sdh_domain::{InvocationUnit, SearchQuery, parse_search_queries, prompts};

impl SdhService {
	/// Derives search queries from the summary. Failures degrade to no queries.
	pub async fn synthesize_queries(&self, summary: &str) -> Vec<SearchQuery> {
		let max_queries = self.cfg.pipeline.max_queries as usize;
		let unit = InvocationUnit::new(prompts::search_queries_prompt(summary, max_queries));
		let response = match self.providers.generator.invoke(&unit).await {
			Ok(response) => response,
			Err(err) => {
				tracing::warn!(error = %err, "Query synthesis failed. Continuing without queries.");

				return Vec::new();
			},
		};

		tracing::debug!(response = %response, "Search query response.");

		let queries = parse_search_queries(&response, max_queries);

		tracing::info!(count = queries.len(), "Synthesized search queries.");

		queries
	}
}
