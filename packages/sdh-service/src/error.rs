pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to fetch ticket #{ticket}: {message}")]
	FetchTicket { ticket: u64, message: String },
	#[error("Failed to summarize ticket #{ticket}: {message}")]
	Summarize { ticket: u64, message: String },
	#[error("Failed to generate the report for ticket #{ticket}: {message}")]
	Report { ticket: u64, message: String },
	#[error("Failed to post the report on ticket #{ticket}: {message}")]
	PostComment { ticket: u64, message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Tracker error: {message}")]
	Tracker { message: String },
}
