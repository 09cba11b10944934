//! Final answer text shown to the person who asked.

use std::collections::HashSet;

use crate::candidate::Candidate;

pub const TRUNCATION_MARKER: &str = "\n\n... (message truncated)";

const POSITION_PLACEHOLDER: &str = "Position not specified";
const LOCATION_PLACEHOLDER: &str = "Location not specified";
const NO_SELECTION_RECOMMENDATION: &str = "**Recommendation:** No suitable candidates were found. Try adjusting the search criteria.";

/// Assembles the answer: query, analysis, then one link per selected candidate with a new URL.
///
/// `selected` must hold valid indices into `candidates`; out-of-range entries are skipped.
pub fn compose(
	user_query: &str,
	analysis: &str,
	candidates: &[Candidate],
	selected: &[usize],
) -> String {
	let mut answer = format!("**Query:** {user_query}\n\n**Agent analysis:**\n{analysis}\n\n");

	if selected.is_empty() {
		answer.push_str(NO_SELECTION_RECOMMENDATION);

		return answer;
	}

	answer.push_str("**Links to matching résumés:**\n");

	let mut seen_urls = HashSet::new();
	let mut ordinal = 1;

	for candidate in selected.iter().filter_map(|index| candidates.get(*index)) {
		if candidate.url.is_empty() || !seen_urls.insert(candidate.url.as_str()) {
			continue;
		}

		answer.push_str(&link_entry(ordinal, candidate));

		ordinal += 1;
	}

	answer
}

pub fn no_matches(user_query: &str) -> String {
	format!("**Query:** {user_query}\n\nNo résumés matched your request.")
}

/// Cuts answers longer than `max_chars` characters and appends [`TRUNCATION_MARKER`].
pub fn truncate_answer(answer: &str, max_chars: usize) -> (String, bool) {
	match answer.char_indices().nth(max_chars) {
		Some((byte_offset, _)) => (format!("{}{TRUNCATION_MARKER}", &answer[..byte_offset]), true),
		None => (answer.to_string(), false),
	}
}

fn link_entry(ordinal: usize, candidate: &Candidate) -> String {
	let position =
		if candidate.position.is_empty() { POSITION_PLACEHOLDER } else { &candidate.position };
	let location =
		if candidate.location.is_empty() { LOCATION_PLACEHOLDER } else { &candidate.location };

	format!(
		"{ordinal}. {position} ({location}, {years} years of experience)\n{url}\n\n",
		years = candidate.experience_years(),
		url = candidate.url,
	)
}
