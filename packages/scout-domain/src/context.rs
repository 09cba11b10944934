use crate::candidate::Candidate;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExcerptLimits {
	pub skills_chars: usize,
	pub text_chars: usize,
}
impl Default for ExcerptLimits {
	fn default() -> Self {
		Self { skills_chars: 150, text_chars: 300 }
	}
}

/// Renders candidates as numbered blocks for the analysis prompt. Ordinals start at 1.
pub fn build_candidate_context(candidates: &[Candidate], limits: ExcerptLimits) -> String {
	candidates
		.iter()
		.enumerate()
		.map(|(index, candidate)| candidate_block(index + 1, candidate, limits))
		.collect::<Vec<_>>()
		.join("\n\n")
}

/// Cuts `text` to at most `max_chars` characters, appending an ellipsis when anything was cut.
pub fn excerpt(text: &str, max_chars: usize) -> String {
	match text.char_indices().nth(max_chars) {
		Some((byte_offset, _)) => format!("{}{ELLIPSIS}", &text[..byte_offset]),
		None => text.to_string(),
	}
}

fn candidate_block(ordinal: usize, candidate: &Candidate, limits: ExcerptLimits) -> String {
	format!(
		"Résumé #{ordinal}:\nPosition: {position}\nLocation: {location}\nExperience: {years} years\nKey skills: {skills}\nSummary: {summary}",
		position = candidate.position,
		location = candidate.location,
		years = candidate.experience_years(),
		skills = excerpt(&candidate.skills, limits.skills_chars),
		summary = excerpt(candidate.text.trim(), limits.text_chars),
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn candidate(skills: &str, text: &str) -> Candidate {
		Candidate {
			id: "1".to_string(),
			url: String::new(),
			position: "frontend developer".to_string(),
			location: "москва".to_string(),
			experience_months: 50,
			skills: skills.to_string(),
			text: text.to_string(),
		}
	}

	#[test]
	fn excerpt_counts_characters_not_bytes() {
		assert_eq!(excerpt("привет", 3), "при...");
		assert_eq!(excerpt("abc", 3), "abc");
		assert_eq!(excerpt("", 3), "");
	}

	#[test]
	fn blocks_are_numbered_from_one() {
		let context = build_candidate_context(
			&[candidate("react", "Builds UIs."), candidate("vue", "Ships apps.")],
			ExcerptLimits::default(),
		);

		assert!(context.starts_with("Résumé #1:\nPosition: frontend developer\nLocation: москва"));
		assert!(context.contains("\n\nRésumé #2:"));
		assert!(context.contains("Experience: 4 years"));
		assert!(context.contains("Summary: Ships apps."));
	}

	#[test]
	fn long_fields_are_capped() {
		let skills = "x".repeat(200);
		let text = "y".repeat(400);
		let context = build_candidate_context(&[candidate(&skills, &text)], ExcerptLimits::default());

		assert!(context.contains(&format!("Key skills: {}...\n", "x".repeat(150))));
		assert!(context.ends_with(&format!("Summary: {}...", "y".repeat(300))));
	}
}
