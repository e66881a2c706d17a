pub mod parsing;
pub mod prompts;
pub mod scoring;
pub mod ticket;
pub mod unit;

pub use parsing::{RelevanceVerdict, SearchQuery, parse_relevance, parse_search_queries};
pub use scoring::{RankedCandidate, rank_candidates, score_ticket};
pub use ticket::{AnalysisResult, Candidate, Comment, Ticket, TicketContent};
pub use unit::InvocationUnit;
