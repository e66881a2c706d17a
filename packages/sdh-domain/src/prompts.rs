pub const SDH_CONTEXT: &str = "\
You are a Software Engineer working on the Elastic Cloud offering.
Elastic Cloud is a managed Elasticsearch service that runs Elasticsearch, Kibana, and related services in the cloud.
GitHub SDH (Support Development Help) issues are opened by Support Engineers to get help from the Engineering team on a specific customer problem with the Elastic Cloud offering.

As a member of the Engineering team you help Support Engineers resolve these issues.
Your goal is to analyze the issue you are assigned and find information in other SDH issues that helps resolve it efficiently.
Focus on technical details and be precise.";

pub const MAIN_SUMMARY_HEADING: &str = "Main Issue Summary:";
pub const SIMILAR_CONTENT_HEADING: &str = "Similar Issue Content:";
pub const FINDINGS_HEADING: &str = "Findings From Similar Issues:";
pub const NO_FINDINGS: &str = "No relevant similar issues were found.";

pub fn summary_prompt() -> String {
	"\
Analyze the following GitHub SDH issue, which you have been assigned. The content includes the initial description posted by Support and the follow-up comments.
Provide a concise summary with three sections:

1. **Investigation So Far:** Which steps have already been taken to diagnose or fix the problem?
2. **Established Conclusions:** Which facts have been confirmed or ruled out?
3. **Open Questions:** Which questions or problems remain unresolved?

Include error messages and any technical details that help identify similar issues.

The SDH issue content is provided in the follow-up messages."
		.to_string()
}

pub fn search_queries_prompt(summary: &str, max_queries: usize) -> String {
	format!(
		"\
Analyze the summary below, which belongs to the GitHub SDH issue you have been assigned.
Generate {max_queries} distinct GitHub search query strings that will find similar SDH issues.
Focus the queries on key error messages, technical components, and problem descriptions.
Do not include explicit IDs in the queries (for example allocator IDs or instance IDs).
Do not include \"repo:\" or \"is:closed\" filters.
Do not add quotation marks around the queries.
Output ONLY the queries.

Put one query on each line with no additional text or formatting.
Do not prefix the lines with numbers or bullet points.

Example output:
database connection timeout
authentication failure ORA-12545
connection pool exhausted JBoss

SDH issue summary:
{summary}"
	)
}

pub fn relevance_prompt(main_number: u64, other_number: u64) -> String {
	format!(
		"\
You have been assigned GitHub SDH issue #{main_number}.
Another SDH issue (#{other_number}) may be related to it.
Analyze the content of both issues and decide whether the other issue contains information that helps resolve the current issue.

Answer with:
1. RELEVANT: true/false
2. If relevant, a summary of how the other issue was resolved and which insights it provides.

The content of both SDH issues is provided in the next two messages.

Format the response exactly as follows, with no additional text or formatting:
RELEVANT: [true/false]
RESOLUTION: [result of your analysis if relevant, or \"N/A\" if not relevant]"
	)
}

pub fn report_prompt(main_number: u64) -> String {
	format!(
		"\
You have been assigned GitHub SDH issue #{main_number}.
You have also collected information from similar resolved issues.
Using the summary of the current issue and the information about the similar issues, write a final report to be posted as a comment on the current GitHub issue.
The report must be in Markdown and contain exactly these four sections:

**A. Summary Of Current Issue:**
A summary of the current issue (you may reuse the summary provided).

**B. Findings From Similar Issues:**
Consolidate the key findings from the similar issues. For each finding, state the information and reference the source issue (for example \"In issue #123, it was found that...\"). If no similar issues were found, say so.

**C. Plausible Cause:**
If possible, state a clear hypothesis about the likely root cause of the current issue, based on the outcomes of the similar past issues.

**D. Recommended Actions:**
Provide a clear, ordered list of concrete steps to investigate or resolve the issue, such as commands to run, logs to check, configurations to verify, or questions for the customer.

Output only the report content, starting with the first heading.

The summary of the main SDH issue and the findings from similar issues are provided in follow-up messages."
	)
}
