mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, GitHub, Llm, LlmBudget, LlmRetry, Pipeline, Service};

use std::{env, fs, path::Path};

pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const GITHUB_REPO_OWNER_ENV: &str = "GITHUB_REPO_OWNER";
pub const GITHUB_REPO_NAME_ENV: &str = "GITHUB_REPO_NAME";
pub const LLM_API_KEY_ENV: &str = "LLM_API_KEY";
pub const MAX_RECENCY_DAYS: i64 = 36_500;
pub const MAX_BASE_BACKOFF_MS: u64 = 3_600_000;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg, |key| env::var(key).ok());

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("github.api_base", &cfg.github.api_base),
		("github.token", &cfg.github.token),
		("github.owner", &cfg.github.owner),
		("github.repo", &cfg.github.repo),
		("llm.api_base", &cfg.llm.api_base),
		("llm.api_key", &cfg.llm.api_key),
		("llm.model", &cfg.llm.model),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.github.search_per_page == 0 || cfg.github.search_per_page > 100 {
		return Err(Error::Validation {
			message: "github.search_per_page must be in the range 1-100.".to_string(),
		});
	}
	if cfg.llm.max_output_tokens == 0 {
		return Err(Error::Validation {
			message: "llm.max_output_tokens must be greater than zero.".to_string(),
		});
	}

	let budget = &cfg.llm.budget;

	if budget.units_per_minute == 0 {
		return Err(Error::Validation {
			message: "llm.budget.units_per_minute must be greater than zero.".to_string(),
		});
	}
	if budget.burst_units == 0 {
		return Err(Error::Validation {
			message: "llm.budget.burst_units must be greater than zero.".to_string(),
		});
	}
	if !budget.chars_per_unit.is_finite() {
		return Err(Error::Validation {
			message: "llm.budget.chars_per_unit must be a finite number.".to_string(),
		});
	}
	if budget.chars_per_unit <= 0.0 {
		return Err(Error::Validation {
			message: "llm.budget.chars_per_unit must be greater than zero.".to_string(),
		});
	}
	if cfg.llm.retry.base_backoff_ms > MAX_BASE_BACKOFF_MS {
		return Err(Error::Validation {
			message: format!("llm.retry.base_backoff_ms must be at most {MAX_BASE_BACKOFF_MS}."),
		});
	}
	if cfg.llm.retry.max_attempts == 0 {
		return Err(Error::Validation {
			message: "llm.retry.max_attempts must be greater than zero.".to_string(),
		});
	}

	for (label, value) in [
		("pipeline.max_queries", cfg.pipeline.max_queries),
		("pipeline.analysis_cap", cfg.pipeline.analysis_cap),
		("pipeline.max_results", cfg.pipeline.max_results),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	if cfg.pipeline.recency_days <= 0 || cfg.pipeline.recency_days > MAX_RECENCY_DAYS {
		return Err(Error::Validation {
			message: format!("pipeline.recency_days must be in the range 1-{MAX_RECENCY_DAYS}."),
		});
	}

	Ok(())
}

/// Trims string fields and fills blank credentials and repository scope from `lookup`.
pub fn normalize<F>(cfg: &mut Config, lookup: F)
where
	F: Fn(&str) -> Option<String>,
{
	for (field, key) in [
		(&mut cfg.github.token, GITHUB_TOKEN_ENV),
		(&mut cfg.github.owner, GITHUB_REPO_OWNER_ENV),
		(&mut cfg.github.repo, GITHUB_REPO_NAME_ENV),
		(&mut cfg.llm.api_key, LLM_API_KEY_ENV),
	] {
		let trimmed = field.trim().to_string();

		*field = if trimmed.is_empty() {
			lookup(key).map(|value| value.trim().to_string()).unwrap_or_default()
		} else {
			trimmed
		};
	}

	cfg.github.api_base = cfg.github.api_base.trim().trim_end_matches('/').to_string();
	cfg.llm.api_base = cfg.llm.api_base.trim().trim_end_matches('/').to_string();
	cfg.llm.model = cfg.llm.model.trim().to_string();
}
