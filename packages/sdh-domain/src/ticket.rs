use time::{OffsetDateTime, format_description::well_known::Rfc2822};

#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
	pub number: u64,
	pub title: String,
	pub body: String,
	pub state: String,
	pub labels: Vec<String>,
	pub comment_count: u32,
	pub closed_at: Option<OffsetDateTime>,
	pub html_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
	pub author: Option<String>,
	pub body: String,
	pub created_at: Option<OffsetDateTime>,
}

/// A ticket together with its comment thread, in creation order.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketContent {
	pub ticket: Ticket,
	pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
	pub content: TicketContent,
	/// The search query that first surfaced this ticket.
	pub query: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
	pub candidate: Candidate,
	pub resolution: String,
}

impl Ticket {
	pub fn new(number: u64, title: impl Into<String>) -> Self {
		Self {
			number,
			title: title.into(),
			body: String::new(),
			state: String::new(),
			labels: Vec::new(),
			comment_count: 0,
			closed_at: None,
			html_url: None,
		}
	}
}

impl TicketContent {
	pub fn new(ticket: Ticket, comments: Vec<Comment>) -> Self {
		Self { ticket, comments }
	}

	pub fn number(&self) -> u64 {
		self.ticket.number
	}

	/// Renders the ticket as one header segment followed by one segment per comment.
	pub fn formatted_segments(&self) -> Vec<String> {
		let total = self.comments.len() + 1;
		let mut segments = Vec::with_capacity(total);
		let mut header = format!("[Message 1/{total}: Main Issue]\n\n");

		header.push_str(&format_ticket(&self.ticket));

		if !self.comments.is_empty() {
			header.push_str(&format!(
				"\n\n---\n\nNote: This issue has {} comments that will follow in subsequent messages.",
				self.comments.len()
			));
		}

		segments.push(header);

		for (idx, comment) in self.comments.iter().enumerate() {
			let ordinal = idx + 1;
			let mut segment = format!("[Message {}/{total}: Comment {ordinal}]\n\n", idx + 2);

			segment.push_str(&format_comment(self.ticket.number, comment, ordinal));

			if ordinal < self.comments.len() {
				segment.push_str(&format!(
					"\n\n---\n\nNote: This is comment {ordinal} of {}. More comments follow in subsequent messages.",
					self.comments.len()
				));
			} else {
				segment.push_str(&format!(
					"\n\n---\n\nNote: This is the final comment ({ordinal} of {}) for this issue.",
					self.comments.len()
				));
			}

			segments.push(segment);
		}

		segments
	}

	pub fn formatted_text(&self) -> String {
		self.formatted_segments().join("\n\n")
	}
}

impl Candidate {
	pub fn new(content: TicketContent, query: impl Into<String>) -> Self {
		Self { content, query: query.into() }
	}

	pub fn number(&self) -> u64 {
		self.content.number()
	}

	pub fn ticket(&self) -> &Ticket {
		&self.content.ticket
	}
}

pub fn format_ticket(ticket: &Ticket) -> String {
	let mut out = String::new();

	if !ticket.title.is_empty() {
		out.push_str(&format!("# Issue #{}: {}\n\n", ticket.number, ticket.title));
	}

	out.push_str("## Issue Details\n\n");

	if !ticket.state.is_empty() {
		out.push_str(&format!("**State:** {}\n", ticket.state));
	}
	if !ticket.labels.is_empty() {
		out.push_str(&format!("**Labels:** {}\n\n", ticket.labels.join(", ")));
	}
	if !ticket.body.is_empty() {
		out.push_str("**Description:**\n");
		out.push_str(&ticket.body);
		out.push_str("\n\n");
	}

	out
}

pub fn format_comment(ticket_number: u64, comment: &Comment, ordinal: usize) -> String {
	let mut out = format!("## Comment {ordinal} on Issue #{ticket_number}\n\n");

	if let Some(author) = comment.author.as_deref().filter(|author| !author.is_empty()) {
		out.push_str(&format!("**Author:** {author}\n"));
	}
	if let Some(created_at) = comment.created_at
		&& let Ok(rendered) = created_at.format(&Rfc2822)
	{
		out.push_str(&format!("**Posted at:** {rendered}\n\n"));
	}
	if !comment.body.is_empty() {
		out.push_str("**Content:**\n");
		out.push_str(&comment.body);
		out.push_str("\n\n");
	}

	out
}
