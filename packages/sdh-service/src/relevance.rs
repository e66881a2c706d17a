use crate::SdhService;
use sdh_domain::{
	AnalysisResult, Candidate, InvocationUnit, RankedCandidate, Ticket, parse_relevance, prompts,
};

impl SdhService {
	/// Asks the generator whether each ranked candidate helps with `main`, best first.
	///
	/// At most `analysis_cap` candidates are analyzed and at most `max_results` are kept. A
	/// failed analysis drops that candidate only.
	pub async fn filter_relevant(
		&self,
		main: &Ticket,
		summary: &str,
		ranked: Vec<RankedCandidate>,
	) -> Vec<AnalysisResult> {
		let pipeline = &self.cfg.pipeline;
		let mut results = Vec::new();

		for RankedCandidate { candidate, score } in
			ranked.into_iter().take(pipeline.analysis_cap as usize)
		{
			if results.len() >= pipeline.max_results as usize {
				break;
			}

			let unit = relevance_unit(main.number, summary, &candidate);
			let response = match self.providers.generator.invoke(&unit).await {
				Ok(response) => response,
				Err(err) => {
					tracing::warn!(
						error = %err,
						ticket = candidate.number(),
						"Relevance analysis failed. Skipping candidate."
					);

					continue;
				},
			};

			tracing::debug!(ticket = candidate.number(), response = %response, "Relevance response.");

			let verdict = parse_relevance(&response);

			tracing::info!(
				ticket = candidate.number(),
				score,
				relevant = verdict.relevant,
				"Analyzed candidate."
			);

			if verdict.relevant {
				results.push(AnalysisResult { candidate, resolution: verdict.resolution });
			}
		}

		results
	}
}

pub fn relevance_unit(main_number: u64, summary: &str, candidate: &Candidate) -> InvocationUnit {
	InvocationUnit::new(prompts::relevance_prompt(main_number, candidate.number()))
		.follow_up(format!("{}\n{summary}", prompts::MAIN_SUMMARY_HEADING))
		.follow_up(format!(
			"{}\n{}",
			prompts::SIMILAR_CONTENT_HEADING,
			candidate.content.formatted_text()
		))
}
