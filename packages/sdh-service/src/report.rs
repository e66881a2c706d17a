use crate::{Error, Result, SdhService};
use sdh_domain::{AnalysisResult, InvocationUnit, prompts};

impl SdhService {
	pub async fn synthesize_report(
		&self,
		ticket: u64,
		summary: &str,
		results: &[AnalysisResult],
	) -> Result<String> {
		let unit = report_unit(ticket, summary, results);
		let report = self
			.providers
			.generator
			.invoke(&unit)
			.await
			.map_err(|err| Error::Report { ticket, message: err.to_string() })?;

		tracing::info!(ticket, findings = results.len(), "Generated report.");

		Ok(report)
	}
}

pub fn report_unit(ticket: u64, summary: &str, results: &[AnalysisResult]) -> InvocationUnit {
	InvocationUnit::new(prompts::report_prompt(ticket))
		.follow_up(format!("{}\n{summary}", prompts::MAIN_SUMMARY_HEADING))
		.follow_up(format!("{}\n{}", prompts::FINDINGS_HEADING, format_findings(results)))
}

/// One block per accepted candidate, or a fixed sentence when there are none.
pub fn format_findings(results: &[AnalysisResult]) -> String {
	if results.is_empty() {
		return prompts::NO_FINDINGS.to_string();
	}

	let mut out = String::new();

	for (idx, result) in results.iter().enumerate() {
		let ticket = result.candidate.ticket();

		if idx > 0 {
			out.push_str("\n\n");
		}

		out.push_str(&format!("Issue #{}: {}", ticket.number, ticket.title));

		if let Some(url) = &ticket.html_url {
			out.push_str(&format!("\nURL: {url}"));
		}

		out.push_str("\nResolution: ");
		out.push_str(&result.resolution);
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use sdh_domain::{Candidate, Ticket, TicketContent};

	fn result(number: u64, url: Option<&str>, resolution: &str) -> AnalysisResult {
		let mut ticket = Ticket::new(number, format!("Ticket {number}"));

		ticket.html_url = url.map(str::to_string);

		AnalysisResult {
			candidate: Candidate::new(TicketContent::new(ticket, Vec::new()), "q"),
			resolution: resolution.to_string(),
		}
	}

	#[test]
	fn empty_findings_state_the_empty_result() {
		let unit = report_unit(42, "sum", &[]);

		assert_eq!(unit.segments().len(), 3);
		assert!(unit.main().contains("#42"));
		assert_eq!(unit.segments()[1], "Main Issue Summary:\nsum");
		assert_eq!(
			unit.segments()[2],
			"Findings From Similar Issues:\nNo relevant similar issues were found."
		);
	}

	#[test]
	fn findings_list_every_result_in_order() {
		let results = [
			result(5, Some("https://github.com/o/r/issues/5"), "Restarted the allocator."),
			result(9, None, "Raised the heap."),
		];

		assert_eq!(
			format_findings(&results),
			"Issue #5: Ticket 5\nURL: https://github.com/o/r/issues/5\nResolution: Restarted the allocator.\n\n\
Issue #9: Ticket 9\nResolution: Raised the heap."
		);
	}
}
