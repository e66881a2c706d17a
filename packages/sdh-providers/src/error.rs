pub type Result<T, E = Error> = std::result::Result<T, E>;

const RATE_LIMIT_MARKERS: [&str; 2] = ["rate_limit_error", "exceed the rate limit"];

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("API returned non-success status code {status}: {body}")]
	Status { status: u16, body: String },
	#[error("API error: {kind} - {message}")]
	Api { kind: String, message: String },
	#[error("Received empty content from the generation service.")]
	EmptyContent,
	#[error("{message}")]
	InvalidResponse { message: String },
	#[error("Quota exceeded after {attempts} attempts: {source}")]
	QuotaExhausted { attempts: u32, source: Box<Error> },
	#[error("{message}")]
	InvalidConfig { message: String },
}
impl Error {
	/// Whether the provider rejected the request because the quota window is exhausted.
	pub fn is_quota(&self) -> bool {
		match self {
			Self::Status { status: 429, .. } => true,
			Self::Reqwest(err) if err.status().map(|status| status.as_u16()) == Some(429) => true,
			Self::QuotaExhausted { .. } => false,
			other => {
				let text = other.to_string();

				RATE_LIMIT_MARKERS.iter().any(|marker| text.contains(marker))
			},
		}
	}
}
