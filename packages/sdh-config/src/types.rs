use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub github: GitHub,
	pub llm: Llm,
	#[serde(default)]
	pub pipeline: Pipeline,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHub {
	#[serde(default = "default_github_api_base")]
	pub api_base: String,
	/// Falls back to `GITHUB_TOKEN` when blank.
	#[serde(default)]
	pub token: String,
	/// Falls back to `GITHUB_REPO_OWNER` when blank.
	#[serde(default)]
	pub owner: String,
	/// Falls back to `GITHUB_REPO_NAME` when blank.
	#[serde(default)]
	pub repo: String,
	#[serde(default = "default_search_per_page")]
	pub search_per_page: u32,
	#[serde(default = "default_github_timeout_ms")]
	pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Llm {
	#[serde(default = "default_llm_api_base")]
	pub api_base: String,
	#[serde(default = "default_llm_path")]
	pub path: String,
	/// Falls back to `LLM_API_KEY` when blank.
	#[serde(default)]
	pub api_key: String,
	pub model: String,
	#[serde(default = "default_anthropic_version")]
	pub anthropic_version: String,
	#[serde(default = "default_max_output_tokens")]
	pub max_output_tokens: u32,
	#[serde(default = "default_llm_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default)]
	pub budget: LlmBudget,
	#[serde(default)]
	pub retry: LlmRetry,
}

/// Consumption-unit quota of the generation service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmBudget {
	pub units_per_minute: u32,
	pub burst_units: u32,
	pub base_units_per_segment: u32,
	pub chars_per_unit: f64,
}
impl Default for LlmBudget {
	fn default() -> Self {
		Self {
			units_per_minute: 19_000,
			burst_units: 19_000,
			base_units_per_segment: 3,
			chars_per_unit: 4.0,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmRetry {
	pub max_attempts: u32,
	pub base_backoff_ms: u64,
}
impl Default for LlmRetry {
	fn default() -> Self {
		Self { max_attempts: 5, base_backoff_ms: 15_000 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Pipeline {
	pub max_queries: u32,
	pub analysis_cap: u32,
	pub max_results: u32,
	pub recency_days: i64,
}
impl Default for Pipeline {
	fn default() -> Self {
		Self { max_queries: 5, analysis_cap: 10, max_results: 10, recency_days: 365 }
	}
}

fn default_github_api_base() -> String {
	"https://api.github.com".to_string()
}

fn default_search_per_page() -> u32 {
	20
}

fn default_github_timeout_ms() -> u64 {
	30_000
}

fn default_llm_api_base() -> String {
	"https://api.anthropic.com".to_string()
}

fn default_llm_path() -> String {
	"/v1/messages".to_string()
}

fn default_anthropic_version() -> String {
	"2023-06-01".to_string()
}

fn default_max_output_tokens() -> u32 {
	4_096
}

fn default_llm_timeout_ms() -> u64 {
	120_000
}
