use std::time::Duration;

use reqwest::{
	Client,
	header::{HeaderMap, HeaderName, HeaderValue},
};
use serde::{Deserialize, Serialize};

use crate::{BoxFuture, Error, Result, Transport};
use sdh_domain::InvocationUnit;

const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");
const VERSION_HEADER: HeaderName = HeaderName::from_static("anthropic-version");

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
	model: &'a str,
	messages: Vec<Message<'a>>,
	max_tokens: u32,
	#[serde(skip_serializing_if = "Option::is_none")]
	system: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
	role: &'static str,
	content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
	#[serde(default)]
	content: Vec<ContentBlock>,
	#[serde(default)]
	error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
	#[serde(default)]
	text: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
	#[serde(rename = "type", default)]
	kind: String,
	#[serde(default)]
	message: String,
}

/// Sends invocation units to the Anthropic Messages API. Each segment becomes one user turn.
#[derive(Debug, Clone)]
pub struct AnthropicTransport {
	http: Client,
	url: String,
	model: String,
	max_tokens: u32,
	system: Option<String>,
}
impl AnthropicTransport {
	pub fn new(cfg: &sdh_config::Llm) -> Result<Self> {
		let mut headers = HeaderMap::new();

		headers.insert(API_KEY_HEADER, HeaderValue::from_str(&cfg.api_key)?);
		headers.insert(VERSION_HEADER, HeaderValue::from_str(&cfg.anthropic_version)?);

		let http = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(headers)
			.build()?;

		Ok(Self {
			http,
			url: format!("{}{}", cfg.api_base, cfg.path),
			model: cfg.model.clone(),
			max_tokens: cfg.max_output_tokens,
			system: None,
		})
	}

	/// Context sent as the system prompt of every request.
	pub fn with_system(mut self, system: impl Into<String>) -> Self {
		self.system = Some(system.into());

		self
	}

	async fn send_unit(&self, unit: &InvocationUnit) -> Result<String> {
		let body = build_request(&self.model, self.max_tokens, self.system.as_deref(), unit);
		let res = self.http.post(&self.url).json(&body).send().await?;
		let status = res.status().as_u16();
		let text = res.text().await?;

		parse_response(status, &text)
	}
}
impl Transport for AnthropicTransport {
	fn send<'a>(&'a self, unit: &'a InvocationUnit) -> BoxFuture<'a, Result<String>> {
		Box::pin(self.send_unit(unit))
	}
}

fn build_request<'a>(
	model: &'a str,
	max_tokens: u32,
	system: Option<&'a str>,
	unit: &'a InvocationUnit,
) -> MessagesRequest<'a> {
	let messages =
		unit.non_empty_segments().map(|content| Message { role: "user", content }).collect();

	MessagesRequest { model, messages, max_tokens, system }
}

fn parse_response(status: u16, body: &str) -> Result<String> {
	if !(200..300).contains(&status) {
		return Err(Error::Status { status, body: body.to_string() });
	}

	let parsed: MessagesResponse = serde_json::from_str(body)?;

	if let Some(error) = parsed.error
		&& !(error.message.is_empty() && error.kind.is_empty())
	{
		return Err(Error::Api { kind: error.kind, message: error.message });
	}

	parsed.content.into_iter().next().map(|block| block.text).ok_or(Error::EmptyContent)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn serializes_segments_as_user_turns() {
		let unit = InvocationUnit::new("instruction").follow_up("").follow_up("content");
		let request = build_request("claude", 4_096, Some("context"), &unit);
		let json = serde_json::to_value(&request).expect("serialize failed");

		assert_eq!(
			json,
			serde_json::json!({
				"model": "claude",
				"messages": [
					{ "role": "user", "content": "instruction" },
					{ "role": "user", "content": "content" }
				],
				"max_tokens": 4096,
				"system": "context"
			})
		);
	}

	#[test]
	fn omits_missing_system_prompt() {
		let unit = InvocationUnit::new("hi");
		let json = serde_json::to_value(build_request("m", 1, None, &unit)).expect("serialize failed");

		assert!(json.get("system").is_none());
	}

	#[test]
	fn extracts_first_text_block() {
		let body = r#"{"content":[{"type":"text","text":"RELEVANT: true"},{"type":"text","text":"ignored"}]}"#;

		assert_eq!(parse_response(200, body).expect("parse failed"), "RELEVANT: true");
	}

	#[test]
	fn empty_content_is_an_error() {
		let err = parse_response(200, r#"{"content":[]}"#).expect_err("expected failure");

		assert!(matches!(err, Error::EmptyContent));
		assert!(!err.is_quota());
	}

	#[test]
	fn malformed_payload_is_not_quota() {
		let err = parse_response(200, "not json").expect_err("expected failure");

		assert!(matches!(err, Error::SerdeJson(_)));
		assert!(!err.is_quota());
	}

	#[test]
	fn error_object_is_surfaced() {
		let body = r#"{"type":"error","error":{"type":"rate_limit_error","message":"Number of request tokens has exceeded your per-minute rate limit"}}"#;
		let err = parse_response(200, body).expect_err("expected failure");

		assert!(matches!(err, Error::Api { .. }));
		assert!(err.is_quota());
	}

	#[test]
	fn non_success_status_keeps_body() {
		let err = parse_response(529, r#"{"error":{"type":"overloaded_error"}}"#)
			.expect_err("expected failure");

		assert!(matches!(err, Error::Status { status: 529, .. }));
		assert!(!err.is_quota());
		assert!(parse_response(429, "").expect_err("expected failure").is_quota());
	}
}
