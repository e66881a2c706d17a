use std::collections::HashSet;

use crate::SdhService;
use sdh_domain::{Candidate, SearchQuery, Ticket, TicketContent};

impl SdhService {
	/// Runs every query against the tracker and gathers the distinct tickets it surfaces, with
	/// their comment threads, in discovery order.
	///
	/// A failed search skips its query and a failed comment fetch skips its ticket. Neither
	/// aborts the collection.
	pub async fn collect_candidates(&self, main: &Ticket, queries: &[SearchQuery]) -> Vec<Candidate> {
		let github = &self.cfg.github;
		let tracker = &self.providers.tracker;
		let mut seen = HashSet::new();
		let mut candidates = Vec::new();

		for query in queries {
			let tickets = match tracker.search(&github.owner, &github.repo, query.as_str()).await {
				Ok(tickets) => tickets,
				Err(err) => {
					tracing::warn!(error = %err, query = %query, "Search failed. Skipping query.");

					continue;
				},
			};

			tracing::debug!(query = %query, hits = tickets.len(), "Search finished.");

			for ticket in tickets {
				if ticket.number == main.number || seen.contains(&ticket.number) {
					continue;
				}

				// Marked seen only once fetched, so a later query may retry a failed ticket.
				match tracker.fetch_comments(&github.owner, &github.repo, &ticket).await {
					Ok(comments) => {
						seen.insert(ticket.number);
						candidates.push(Candidate::new(
							TicketContent::new(ticket, comments),
							query.as_str(),
						));
					},
					Err(err) => {
						tracing::warn!(
							error = %err,
							ticket = ticket.number,
							"Comment fetch failed. Skipping candidate."
						);
					},
				}
			}
		}

		tracing::info!(ticket = main.number, count = candidates.len(), "Collected candidates.");

		candidates
	}
}
