use std::time::Duration;

use reqwest::{
	Client, RequestBuilder,
	header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue, USER_AGENT},
};
use serde::{Deserialize, de::DeserializeOwned};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{Error, Result};
use sdh_domain::{Comment, Ticket};

const API_VERSION_HEADER: HeaderName = HeaderName::from_static("x-github-api-version");
const API_VERSION: &str = "2022-11-28";
const COMMENTS_PER_PAGE: usize = 100;
const MAX_COMMENT_PAGES: u32 = 10;
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Deserialize)]
struct IssueWire {
	number: u64,
	#[serde(default)]
	title: String,
	#[serde(default)]
	body: Option<String>,
	#[serde(default)]
	state: String,
	#[serde(default)]
	labels: Vec<LabelWire>,
	#[serde(default)]
	comments: u32,
	#[serde(default)]
	closed_at: Option<String>,
	#[serde(default)]
	html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LabelWire {
	#[serde(default)]
	name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentWire {
	#[serde(default)]
	user: Option<UserWire>,
	#[serde(default)]
	body: Option<String>,
	#[serde(default)]
	created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserWire {
	#[serde(default)]
	login: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchWire {
	#[serde(default)]
	items: Vec<IssueWire>,
}

/// GitHub REST client scoped to issue reads, issue search and issue comments.
#[derive(Debug, Clone)]
pub struct GitHubClient {
	http: Client,
	api_base: String,
	search_per_page: u32,
}
impl GitHubClient {
	pub fn new(cfg: &sdh_config::GitHub) -> Result<Self> {
		let mut headers = HeaderMap::new();

		headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
		headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", cfg.token))?);
		headers.insert(USER_AGENT, HeaderValue::from_static("sdh-agent"));
		headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));

		let http = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(headers)
			.build()?;

		Ok(Self { http, api_base: cfg.api_base.clone(), search_per_page: cfg.search_per_page })
	}

	pub async fn fetch_ticket(&self, owner: &str, repo: &str, number: u64) -> Result<Ticket> {
		let url = format!("{}/repos/{owner}/{repo}/issues/{number}", self.api_base);
		let issue: IssueWire = send_json(self.http.get(url)).await?;

		Ok(issue.into_ticket())
	}

	pub async fn fetch_comments(
		&self,
		owner: &str,
		repo: &str,
		ticket: &Ticket,
	) -> Result<Vec<Comment>> {
		let url = format!("{}/repos/{owner}/{repo}/issues/{}/comments", self.api_base, ticket.number);
		let mut comments = Vec::new();

		for page in 1..=MAX_COMMENT_PAGES {
			let request = self
				.http
				.get(&url)
				.query(&[("per_page", COMMENTS_PER_PAGE as u32), ("page", page)]);
			let batch: Vec<CommentWire> = send_json(request).await?;
			let done = batch.len() < COMMENTS_PER_PAGE;

			comments.extend(batch.into_iter().map(CommentWire::into_comment));

			if done {
				break;
			}
		}

		Ok(comments)
	}

	/// Closed issues of `owner/repo` matching `query`, in GitHub's best-match order.
	pub async fn search(&self, owner: &str, repo: &str, query: &str) -> Result<Vec<Ticket>> {
		let url = format!("{}/search/issues", self.api_base);
		let q = scoped_query(owner, repo, query);
		let per_page = self.search_per_page.to_string();
		let request =
			self.http.get(url).query(&[("q", q.as_str()), ("per_page", per_page.as_str())]);
		let result: SearchWire = send_json(request).await?;

		Ok(result.items.into_iter().map(IssueWire::into_ticket).collect())
	}

	pub async fn post_comment(&self, owner: &str, repo: &str, number: u64, body: &str) -> Result<()> {
		let url = format!("{}/repos/{owner}/{repo}/issues/{number}/comments", self.api_base);
		let request = self.http.post(url).json(&serde_json::json!({ "body": body }));
		let res = request.send().await?;
		let status = res.status();

		if !status.is_success() {
			let body = res.text().await.unwrap_or_default();

			return Err(status_error(status.as_u16(), &body));
		}

		Ok(())
	}
}

impl IssueWire {
	fn into_ticket(self) -> Ticket {
		Ticket {
			number: self.number,
			title: self.title,
			body: self.body.unwrap_or_default(),
			state: self.state,
			labels: self.labels.into_iter().filter_map(|label| label.name).collect(),
			comment_count: self.comments,
			closed_at: parse_timestamp(self.closed_at.as_deref()),
			html_url: self.html_url,
		}
	}
}

impl CommentWire {
	fn into_comment(self) -> Comment {
		Comment {
			author: self.user.and_then(|user| user.login),
			body: self.body.unwrap_or_default(),
			created_at: parse_timestamp(self.created_at.as_deref()),
		}
	}
}

pub fn scoped_query(owner: &str, repo: &str, query: &str) -> String {
	format!("{} repo:{owner}/{repo} is:issue is:closed", query.trim())
}

async fn send_json<T>(request: RequestBuilder) -> Result<T>
where
	T: DeserializeOwned,
{
	let res = request.send().await?;
	let status = res.status();
	let body = res.text().await?;

	if !status.is_success() {
		return Err(status_error(status.as_u16(), &body));
	}

	Ok(serde_json::from_str(&body)?)
}

fn status_error(status: u16, body: &str) -> Error {
	let mut truncated: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();

	if truncated.len() < body.len() {
		truncated.push_str("...");
	}

	Error::Status { status, body: truncated }
}

fn parse_timestamp(raw: Option<&str>) -> Option<OffsetDateTime> {
	raw.and_then(|raw| OffsetDateTime::parse(raw, &Rfc3339).ok())
}
