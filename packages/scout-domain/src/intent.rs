//! Structured search intent recovered from the planning completion.

pub mod lenient;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use self::lenient::Extracted;

pub const MAX_SEARCH_QUERIES: usize = 3;
pub const DEFAULT_ANALYSIS_INSTRUCTIONS: &str =
	"Assess how well each résumé matches the request and keep only the relevant ones.";

const FALLBACK_THOUGHT_PROCESS: &str =
	"The planning completion could not be parsed; falling back to a generic React search.";
const FALLBACK_SEARCH_QUERIES: [&str; 3] =
	["React developer", "Frontend React developer", "React.js engineer"];
const FALLBACK_REQUIRED_SKILLS: [&str; 2] = ["react", "react.js"];
const FALLBACK_ANALYSIS_INSTRUCTIONS: &str = "Find candidates who know React or React.js.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredIntent {
	pub thought_process: String,
	pub search_queries: Vec<String>,
	pub filters: IntentFilters,
	pub analysis_instructions: String,
	pub requires_refinement: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentFilters {
	/// Raw location as planned. Null sentinels such as `"null"` are kept and dropped later.
	pub location: Option<String>,
	pub min_experience_years: Option<u32>,
	pub required_skills: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentOrigin {
	Strict,
	Recovered,
	Fallback,
}
impl IntentOrigin {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Strict => "strict",
			Self::Recovered => "recovered",
			Self::Fallback => "fallback",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIntent {
	pub intent: StructuredIntent,
	pub origin: IntentOrigin,
}

/// Parses a planning completion into a fully populated intent. Never fails.
///
/// `user_query` becomes the only sub-query when the completion names none.
pub fn parse_intent(raw: &str, user_query: &str) -> ParsedIntent {
	let (object, origin) = match lenient::extract_object(raw) {
		Extracted::Strict(object) => (object, IntentOrigin::Strict),
		Extracted::Recovered(object) => (object, IntentOrigin::Recovered),
		Extracted::Unparsable =>
			return ParsedIntent { intent: fallback_intent(), origin: IntentOrigin::Fallback },
	};

	ParsedIntent { intent: intent_from_object(&object, user_query), origin }
}

pub fn fallback_intent() -> StructuredIntent {
	StructuredIntent {
		thought_process: FALLBACK_THOUGHT_PROCESS.to_string(),
		search_queries: FALLBACK_SEARCH_QUERIES.iter().map(|query| query.to_string()).collect(),
		filters: IntentFilters {
			location: None,
			min_experience_years: None,
			required_skills: FALLBACK_REQUIRED_SKILLS.iter().map(|skill| skill.to_string()).collect(),
		},
		analysis_instructions: FALLBACK_ANALYSIS_INSTRUCTIONS.to_string(),
		requires_refinement: false,
	}
}

fn intent_from_object(object: &Map<String, Value>, user_query: &str) -> StructuredIntent {
	let filters = object.get("filters").and_then(Value::as_object);

	StructuredIntent {
		thought_process: text_field(object.get("thought_process")).unwrap_or_default(),
		search_queries: search_queries(object.get("search_queries"), user_query),
		filters: IntentFilters {
			location: filters.and_then(|filters| text_field(filters.get("location"))),
			min_experience_years: filters
				.and_then(|filters| filters.get("min_experience_years"))
				.and_then(experience_years),
			required_skills: filters
				.and_then(|filters| filters.get("required_skills"))
				.map(skill_list)
				.unwrap_or_default(),
		},
		analysis_instructions: text_field(object.get("analysis_instructions"))
			.unwrap_or_else(|| DEFAULT_ANALYSIS_INSTRUCTIONS.to_string()),
		requires_refinement: object.get("requires_refinement").and_then(flag).unwrap_or(false),
	}
}

fn text_field(value: Option<&Value>) -> Option<String> {
	let trimmed = value?.as_str()?.trim();

	(!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn search_queries(value: Option<&Value>, user_query: &str) -> Vec<String> {
	let raw: Vec<&str> = match value {
		Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
		Some(Value::String(single)) => vec![single.as_str()],
		_ => Vec::new(),
	};
	let mut out = Vec::new();
	let mut seen = HashSet::new();

	for query in raw {
		if out.len() >= MAX_SEARCH_QUERIES {
			break;
		}

		push_query(&mut out, &mut seen, query);
	}

	if out.is_empty() {
		push_query(&mut out, &mut seen, user_query);
	}
	if out.is_empty() {
		return fallback_intent().search_queries;
	}

	out
}

fn push_query(out: &mut Vec<String>, seen: &mut HashSet<String>, value: &str) {
	let trimmed = value.trim();

	if trimmed.is_empty() {
		return;
	}
	if seen.insert(trimmed.to_lowercase()) {
		out.push(trimmed.to_string());
	}
}

fn experience_years(value: &Value) -> Option<u32> {
	match value {
		Value::Number(number) => {
			if let Some(whole) = number.as_u64() {
				return u32::try_from(whole).ok();
			}

			number.as_f64().and_then(whole_years)
		},
		Value::String(text) => {
			let trimmed = text.trim();

			trimmed.parse::<u32>().ok().or_else(|| trimmed.parse::<f64>().ok().and_then(whole_years))
		},
		_ => None,
	}
}

fn whole_years(value: f64) -> Option<u32> {
	if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX) {
		return None;
	}

	Some(value.trunc() as u32)
}

fn skill_list(value: &Value) -> Vec<String> {
	let Some(items) = value.as_array() else {
		return Vec::new();
	};

	items
		.iter()
		.filter_map(|item| match item {
			Value::String(text) => Some(text.trim().to_string()),
			Value::Number(number) => Some(number.to_string()),
			_ => None,
		})
		.filter(|skill| !skill.is_empty())
		.collect()
}

fn flag(value: &Value) -> Option<bool> {
	match value {
		Value::Bool(flag) => Some(*flag),
		Value::String(text) if text.trim().eq_ignore_ascii_case("true") => Some(true),
		Value::String(text) if text.trim().eq_ignore_ascii_case("false") => Some(false),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn experience_accepts_numbers_and_numeric_strings() {
		assert_eq!(experience_years(&serde_json::json!(3)), Some(3));
		assert_eq!(experience_years(&serde_json::json!(2.7)), Some(2));
		assert_eq!(experience_years(&serde_json::json!("5")), Some(5));
		assert_eq!(experience_years(&serde_json::json!(" 4.0 ")), Some(4));
		assert_eq!(experience_years(&serde_json::json!(-1)), None);
		assert_eq!(experience_years(&serde_json::json!("null")), None);
		assert_eq!(experience_years(&serde_json::json!("three")), None);
		assert_eq!(experience_years(&serde_json::json!(true)), None);
	}

	#[test]
	fn search_queries_dedupe_and_cap() {
		let value = serde_json::json!(["React", "react ", "Vue", "", "Angular", "Svelte"]);

		assert_eq!(
			search_queries(Some(&value), "ignored"),
			vec!["React".to_string(), "Vue".to_string(), "Angular".to_string()]
		);
	}

	#[test]
	fn missing_search_queries_use_user_query() {
		assert_eq!(search_queries(None, "  Go developers "), vec!["Go developers".to_string()]);
		assert_eq!(
			search_queries(Some(&serde_json::json!([])), "Go developers"),
			vec!["Go developers".to_string()]
		);
		assert_eq!(search_queries(None, "   "), fallback_intent().search_queries);
	}

	#[test]
	fn skill_list_keeps_strings_and_numbers() {
		let value = serde_json::json!(["React", null, 1, " ", "SQL"]);

		assert_eq!(
			skill_list(&value),
			vec!["React".to_string(), "1".to_string(), "SQL".to_string()]
		);
		assert!(skill_list(&serde_json::json!("React")).is_empty());
	}

	#[test]
	fn refinement_flag_accepts_strings() {
		assert_eq!(flag(&serde_json::json!("TRUE")), Some(true));
		assert_eq!(flag(&serde_json::json!(false)), Some(false));
		assert_eq!(flag(&serde_json::json!(1)), None);
	}
}
