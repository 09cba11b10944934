//! Extraction of candidate citations from a free-text analysis completion.
//!
//! The analysis text is untrusted: every ordinal is validated against the candidate count
//! before it is used.

use std::collections::BTreeSet;

use regex::Regex;

/// Returns sorted, deduplicated 0-based indices cited by `analysis`, all below `candidate_count`.
pub fn extract_citations(analysis: &str, candidate_count: usize) -> Vec<usize> {
	cited_ordinals(analysis)
		.into_iter()
		.filter_map(|ordinal| ordinal.checked_sub(1))
		.filter(|index| *index < candidate_count)
		.collect::<BTreeSet<_>>()
		.into_iter()
		.collect()
}

/// Collects every 1-based ordinal the text mentions, valid or not.
///
/// A line that opens with a comma-separated run of numbers contributes every integer on it.
/// Any other line contributes explicit "Résumé #N" mentions only.
pub fn cited_ordinals(analysis: &str) -> Vec<usize> {
	let (Ok(list_start), Ok(number), Ok(mention)) = (
		Regex::new(r"^\d+(?:\s*,\s*\d+)*"),
		Regex::new(r"\b(\d+)\b"),
		Regex::new(r"(?i)\b(?:résumé|resume|резюме)\s+#?(\d+)\b"),
	) else {
		return Vec::new();
	};
	let mut ordinals = Vec::new();

	for line in analysis.lines() {
		let captures: Vec<&str> = if list_start.is_match(line.trim()) {
			number.captures_iter(line).filter_map(|caps| caps.get(1)).map(|m| m.as_str()).collect()
		} else {
			mention.captures_iter(line).filter_map(|caps| caps.get(1)).map(|m| m.as_str()).collect()
		};

		ordinals.extend(captures.into_iter().filter_map(|digits| digits.parse::<usize>().ok()));
	}

	ordinals
}
