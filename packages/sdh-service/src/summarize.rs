use crate::{Error, Result, SdhService};
use sdh_domain::{InvocationUnit, TicketContent, prompts};

impl SdhService {
	/// Condenses the ticket and its thread into the summary that drives every later stage.
	pub async fn summarize(&self, content: &TicketContent) -> Result<String> {
		let unit = summary_unit(content);
		let summary = self.providers.generator.invoke(&unit).await.map_err(|err| {
			Error::Summarize { ticket: content.number(), message: err.to_string() }
		})?;

		tracing::info!(ticket = content.number(), "Summarized ticket.");
		tracing::debug!(ticket = content.number(), summary = %summary, "Summary response.");

		Ok(summary)
	}
}

pub fn summary_unit(content: &TicketContent) -> InvocationUnit {
	InvocationUnit::new(prompts::summary_prompt()).follow_ups(content.formatted_segments())
}
