use std::collections::HashSet;

use time::{Duration, OffsetDateTime};

use crate::ticket::{Candidate, Ticket};

pub const LABEL_MATCH_WEIGHT: f64 = 0.2;
pub const ENGAGEMENT_BONUS: f64 = 1.0;
pub const ENGAGEMENT_MIN_COMMENTS: u32 = 5;
pub const RECENCY_BONUS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
	pub candidate: Candidate,
	pub score: f64,
}

/// Metadata heuristic for how promising `candidate` is as a reference for `main`.
///
/// Shared labels count per distinct name. Engagement and recency only look at the candidate.
pub fn score_ticket(
	main: &Ticket,
	candidate: &Ticket,
	now: OffsetDateTime,
	recency_window: Duration,
) -> f64 {
	let mut score = 0.0;
	let main_labels: HashSet<&str> = main.labels.iter().map(String::as_str).collect();
	let shared = candidate
		.labels
		.iter()
		.map(String::as_str)
		.collect::<HashSet<_>>()
		.intersection(&main_labels)
		.count();

	score += LABEL_MATCH_WEIGHT * shared as f64;

	if candidate.comment_count > ENGAGEMENT_MIN_COMMENTS {
		score += ENGAGEMENT_BONUS;
	}

	// A window reaching past the representable range covers every closed ticket.
	if let Some(closed_at) = candidate.closed_at
		&& now.checked_sub(recency_window).is_none_or(|cutoff| closed_at > cutoff)
	{
		score += RECENCY_BONUS;
	}

	score
}

/// Orders candidates by descending score. Equal scores keep discovery order.
pub fn rank_candidates(
	main: &Ticket,
	candidates: Vec<Candidate>,
	now: OffsetDateTime,
	recency_window: Duration,
) -> Vec<RankedCandidate> {
	let mut ranked: Vec<RankedCandidate> = candidates
		.into_iter()
		.map(|candidate| {
			let score = score_ticket(main, candidate.ticket(), now, recency_window);

			RankedCandidate { candidate, score }
		})
		.collect();

	ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

	ranked
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use super::*;
	use crate::ticket::TicketContent;

	const NOW: OffsetDateTime = datetime!(2025-06-01 00:00 UTC);

	fn ticket(number: u64, labels: &[&str]) -> Ticket {
		let mut ticket = Ticket::new(number, format!("ticket {number}"));

		ticket.labels = labels.iter().map(|label| label.to_string()).collect();

		ticket
	}

	fn candidate(ticket: Ticket) -> Candidate {
		Candidate::new(TicketContent::new(ticket, Vec::new()), "query")
	}

	#[test]
	fn bare_metadata_scores_zero() {
		let score = score_ticket(&Ticket::new(1, "a"), &Ticket::new(2, "b"), NOW, Duration::days(365));

		assert_eq!(score, 0.0);
	}

	#[test]
	fn shared_labels_count_once_per_name() {
		let main = ticket(1, &["sdh", "allocator", "snapshot"]);
		let other = ticket(2, &["allocator", "snapshot", "snapshot", "kibana"]);
		let score = score_ticket(&main, &other, NOW, Duration::days(365));

		assert!((score - 0.4).abs() < 1e-9, "unexpected score {score}");
	}

	#[test]
	fn label_term_is_symmetric() {
		let a = ticket(1, &["x", "y", "z"]);
		let b = ticket(2, &["y", "z", "w"]);
		let window = Duration::days(365);

		assert_eq!(score_ticket(&a, &b, NOW, window), score_ticket(&b, &a, NOW, window));
	}

	#[test]
	fn engagement_needs_more_than_five_comments() {
		let main = Ticket::new(1, "main");
		let mut other = Ticket::new(2, "other");

		other.comment_count = 5;

		assert_eq!(score_ticket(&main, &other, NOW, Duration::days(365)), 0.0);

		other.comment_count = 6;

		assert_eq!(score_ticket(&main, &other, NOW, Duration::days(365)), 1.0);
	}

	#[test]
	fn oversized_recency_window_counts_every_closed_ticket() {
		let main = Ticket::new(1, "main");
		let mut other = Ticket::new(2, "other");

		other.closed_at = Some(datetime!(1990-01-01 00:00 UTC));

		assert_eq!(score_ticket(&main, &other, NOW, Duration::days(10_000_000)), 1.0);
		assert_eq!(score_ticket(&main, &Ticket::new(3, "open"), NOW, Duration::MAX), 0.0);
	}

	#[test]
	fn recency_counts_only_inside_window() {
		let main = Ticket::new(1, "main");
		let mut recent = Ticket::new(2, "recent");
		let mut stale = Ticket::new(3, "stale");

		recent.closed_at = Some(datetime!(2025-01-15 00:00 UTC));
		stale.closed_at = Some(datetime!(2024-05-01 00:00 UTC));

		assert_eq!(score_ticket(&main, &recent, NOW, Duration::days(365)), 1.0);
		assert_eq!(score_ticket(&main, &stale, NOW, Duration::days(365)), 0.0);
	}

	#[test]
	fn ranking_is_stable_for_ties() {
		let main = ticket(1, &["sdh"]);
		let mut engaged = ticket(4, &[]);

		engaged.comment_count = 12;

		let ranked = rank_candidates(
			&main,
			vec![
				candidate(ticket(2, &[])),
				candidate(ticket(3, &["sdh"])),
				candidate(engaged),
				candidate(ticket(5, &[])),
				candidate(ticket(6, &["sdh"])),
			],
			NOW,
			Duration::days(365),
		);
		let order: Vec<u64> = ranked.iter().map(|ranked| ranked.candidate.number()).collect();

		assert_eq!(order, vec![4, 3, 6, 2, 5]);
	}
}
