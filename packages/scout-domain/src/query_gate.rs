#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryRejection {
	TooShort { min_chars: usize },
	NumericOnly,
	Blocked,
}
impl QueryRejection {
	pub fn code(self) -> &'static str {
		match self {
			Self::TooShort { .. } => "QUERY_TOO_SHORT",
			Self::NumericOnly => "QUERY_NUMERIC_ONLY",
			Self::Blocked => "QUERY_BLOCKED",
		}
	}

	pub fn message(self) -> String {
		match self {
			Self::TooShort { min_chars } => format!(
				"Query is too short; describe the skills, location, or experience you need in at least {min_chars} characters."
			),
			Self::NumericOnly =>
				"Query must describe a candidate, not just a number.".to_string(),
			Self::Blocked => "Query contains disallowed language.".to_string(),
		}
	}
}

/// Decides whether a raw query is worth sending through the pipeline.
///
/// `blocked_words` are expected lowercase.
pub fn check_query(
	query: &str,
	min_chars: usize,
	blocked_words: &[String],
) -> Result<(), QueryRejection> {
	let trimmed = query.trim();

	if trimmed.chars().count() < min_chars || trimmed.is_empty() {
		return Err(QueryRejection::TooShort { min_chars });
	}
	if trimmed.chars().all(|ch| ch.is_ascii_digit()) {
		return Err(QueryRejection::NumericOnly);
	}

	let lowered = trimmed.to_lowercase();

	if blocked_words.iter().any(|word| !word.is_empty() && lowered.contains(word.as_str())) {
		return Err(QueryRejection::Blocked);
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_short_numeric_and_blocked_queries() {
		let blocked = vec!["spam".to_string()];

		assert_eq!(check_query(" ab ", 3, &blocked), Err(QueryRejection::TooShort { min_chars: 3 }));
		assert_eq!(check_query("", 0, &blocked), Err(QueryRejection::TooShort { min_chars: 0 }));
		assert_eq!(check_query("12345", 3, &blocked), Err(QueryRejection::NumericOnly));
		assert_eq!(check_query("SPAM bots", 3, &blocked), Err(QueryRejection::Blocked));
		assert_eq!(check_query("Go developers", 3, &blocked), Ok(()));
	}
}
