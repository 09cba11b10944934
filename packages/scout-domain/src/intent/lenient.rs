//! Staged recovery of a JSON object from loosely formatted completion text.
//!
//! Each stage is a plain function so it can be exercised on its own. [`extract_object`] chains
//! them and reports which stage produced the object.

use regex::{Captures, Regex};
use serde_json::{Map, Value};

/// Outcome of running the extraction stages over a completion.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
	/// The fence-stripped, string-repaired text parsed as an object.
	Strict(Map<String, Value>),
	/// Only the outermost brace-delimited span parsed after control characters were blanked.
	Recovered(Map<String, Value>),
	Unparsable,
}

pub fn extract_object(raw: &str) -> Extracted {
	let cleaned = strip_fences(raw);
	let repaired = escape_string_literals(&cleaned);

	if let Some(object) = parse_object(&repaired) {
		return Extracted::Strict(object);
	}

	let blanked = strip_control_chars(&cleaned);

	if let Some(object) = outermost_object(&blanked).and_then(parse_object) {
		return Extracted::Recovered(object);
	}

	Extracted::Unparsable
}

/// Removes markdown code fences, surrounding whitespace, and one pair of wrapping quotes.
pub fn strip_fences(raw: &str) -> String {
	let unfenced = match Regex::new(r"```json\n?|\n?```") {
		Ok(re) => re.replace_all(raw, "").into_owned(),
		Err(_) => raw.to_string(),
	};
	let trimmed = unfenced.trim();

	trimmed
		.strip_prefix('"')
		.and_then(|inner| inner.strip_suffix('"'))
		.unwrap_or(trimmed)
		.to_string()
}

/// Escapes raw control characters and stray quotes inside every quoted run.
///
/// Completions often put literal line breaks inside string values, which strict JSON rejects.
pub fn escape_string_literals(text: &str) -> String {
	let Ok(re) = Regex::new(r#""([^"\\]*(?:\\.[^"\\]*)*)""#) else {
		return text.to_string();
	};

	re.replace_all(text, |caps: &Captures<'_>| {
		let inner = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

		format!("\"{}\"", escape_inner(inner))
	})
	.into_owned()
}

/// Replaces every ASCII control character with a space.
pub fn strip_control_chars(text: &str) -> String {
	text.chars().map(|ch| if ch.is_ascii_control() { ' ' } else { ch }).collect()
}

/// Returns the span from the first `{` to the brace that closes it.
///
/// When the braces never balance, the span runs to the last `}` in the text instead.
pub fn outermost_object(text: &str) -> Option<&str> {
	let start = text.find('{')?;
	let mut depth = 0_usize;
	let mut in_string = false;
	let mut escaped = false;

	for (offset, ch) in text[start..].char_indices() {
		if in_string {
			match ch {
				_ if escaped => escaped = false,
				'\\' => escaped = true,
				'"' => in_string = false,
				_ => {},
			}

			continue;
		}

		match ch {
			'"' => in_string = true,
			'{' => depth += 1,
			'}' => {
				depth -= 1;

				if depth == 0 {
					return Some(&text[start..start + offset + ch.len_utf8()]);
				}
			},
			_ => {},
		}
	}

	let end = text.rfind('}')?;

	(end > start).then(|| &text[start..=end])
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
	match serde_json::from_str::<Value>(text).ok()? {
		Value::Object(object) => Some(object),
		_ => None,
	}
}

fn escape_inner(inner: &str) -> String {
	let mut out = String::with_capacity(inner.len());
	let mut chars = inner.chars();

	while let Some(ch) = chars.next() {
		match ch {
			'\\' => {
				out.push('\\');

				if let Some(next) = chars.next() {
					out.push(next);
				}
			},
			'\n' => out.push_str("\\n"),
			'\r' => out.push_str("\\r"),
			'\t' => out.push_str("\\t"),
			'"' => out.push_str("\\\""),
			other => out.push(other),
		}
	}

	out
}
