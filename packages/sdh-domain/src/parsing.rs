use std::fmt;

pub const RELEVANT_PREFIX: &str = "RELEVANT:";
pub const RESOLUTION_PREFIX: &str = "RESOLUTION:";
pub const MAX_QUERY_CHARS: usize = 256;

/// A trimmed, non-empty tracker search string of at most [`MAX_QUERY_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery(String);
impl SearchQuery {
	pub fn new(raw: &str) -> Option<Self> {
		let trimmed = raw.trim();

		if trimmed.is_empty() {
			return None;
		}

		let bounded: String = trimmed.chars().take(MAX_QUERY_CHARS).collect();

		Some(Self(bounded.trim_end().to_string()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl fmt::Display for SearchQuery {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelevanceVerdict {
	pub relevant: bool,
	pub resolution: String,
}

/// Reads the `RELEVANT:` / `RESOLUTION:` answer format.
///
/// Anything that does not follow the format is treated as "not relevant". The resolution runs
/// from the `RESOLUTION:` line to the end of the text and is only kept for relevant answers.
pub fn parse_relevance(response: &str) -> RelevanceVerdict {
	let text = response.trim_start();
	let (first, rest) = text.split_once('\n').unwrap_or((text, ""));
	let Some(flag) = first.trim().strip_prefix(RELEVANT_PREFIX) else {
		return RelevanceVerdict::default();
	};

	if !flag.to_lowercase().contains("true") {
		return RelevanceVerdict::default();
	}

	let mut offset = 0;

	for line in rest.split_inclusive('\n') {
		let indent = line.len() - line.trim_start().len();

		if line[indent..].starts_with(RESOLUTION_PREFIX) {
			let start = offset + indent + RESOLUTION_PREFIX.len();

			return RelevanceVerdict { relevant: true, resolution: rest[start..].trim().to_string() };
		}

		offset += line.len();
	}

	RelevanceVerdict { relevant: true, resolution: String::new() }
}

/// One query per non-blank line, in order, truncated to `max_queries`.
pub fn parse_search_queries(response: &str, max_queries: usize) -> Vec<SearchQuery> {
	response.lines().filter_map(SearchQuery::new).take(max_queries).collect()
}
