use scout_domain::intent::{self, ParsedIntent};

use crate::{Result, ScoutService};

const PLANNER_SYSTEM_PROMPT: &str =
	"You are an expert at sourcing software engineers. Be specific and precise.";

impl ScoutService {
	/// Turns the user's query into a structured search intent.
	pub async fn plan(&self, user_query: &str) -> Result<ParsedIntent> {
		let messages =
			scout_providers::system_and_user(PLANNER_SYSTEM_PROMPT, &planning_prompt(user_query));
		let raw = self.complete_with_retry("plan", &messages).await?;
		let parsed = intent::parse_intent(&raw, user_query);

		match parsed.origin {
			intent::IntentOrigin::Fallback => tracing::warn!(
				origin = parsed.origin.as_str(),
				"Planning completion was unusable. Using the default intent."
			),
			_ => tracing::info!(
				origin = parsed.origin.as_str(),
				thought_process = %parsed.intent.thought_process,
				search_queries = ?parsed.intent.search_queries,
				"Search planned."
			),
		}

		Ok(parsed)
	}
}

pub fn planning_prompt(user_query: &str) -> String {
	format!(
		r#"You are a recruiting analyst searching a database of résumés.

User request: "{user_query}"

Your task:
1. Analyze the request and identify its key elements:
- Technologies and skills (React, Python, ML, ...)
- City or location (Moscow, remote, ...)
- Experience requirements (3+ years, junior or senior, ...)
- Role (frontend, backend, data scientist, ...)
2. Write 1-3 search queries for a vector search.
3. Decide which filters narrow the search.

Return the answer in STRICT JSON format:
{{
"thought_process": "Short analysis of the request",
"search_queries": ["query1", "query2"],
"filters": {{
    "location": null,
    "min_experience_years": null,
    "required_skills": ["React"]
}},
"analysis_instructions": "How to review the résumés",
"requires_refinement": false
}}

Rules:
1. Use double quotes only.
2. No trailing commas after the last element.
3. Every string value stays on one line.
4. No comments inside the JSON."#
	)
}
