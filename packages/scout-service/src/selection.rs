use scout_domain::{
	candidate::Candidate,
	citation,
	context::{self, ExcerptLimits},
	intent::DEFAULT_ANALYSIS_INSTRUCTIONS,
};

use crate::{Result, ScoutService};

const SELECTOR_SYSTEM_PROMPT: &str =
	"You are a strict recruiting analyst. Select only candidates who genuinely fit.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
	/// The completion text, shown to the user verbatim.
	pub analysis: String,
	/// Validated 0-based candidate indices, ascending.
	pub selected: Vec<usize>,
}

impl ScoutService {
	/// Asks the completion service which candidates fit and parses its citations.
	pub async fn select(
		&self,
		user_query: &str,
		analysis_instructions: &str,
		candidates: &[Candidate],
	) -> Result<Selection> {
		let limits = ExcerptLimits {
			skills_chars: self.cfg.selection.skills_excerpt_chars as usize,
			text_chars: self.cfg.selection.text_excerpt_chars as usize,
		};
		let context = context::build_candidate_context(candidates, limits);
		let prompt = analysis_prompt(user_query, analysis_instructions, &context);
		let messages = scout_providers::system_and_user(SELECTOR_SYSTEM_PROMPT, &prompt);
		let analysis = self.complete_with_retry("select", &messages).await?;
		let cited = citation::cited_ordinals(&analysis);
		let selected = citation::extract_citations(&analysis, candidates.len());

		if cited.len() > selected.len() {
			tracing::debug!(
				cited = ?cited,
				selected = ?selected,
				"Dropped duplicate or out-of-range citations."
			);
		}

		Ok(Selection { analysis, selected })
	}
}

pub fn analysis_prompt(user_query: &str, analysis_instructions: &str, context: &str) -> String {
	let instructions = match analysis_instructions.trim() {
		"" => DEFAULT_ANALYSIS_INSTRUCTIONS,
		trimmed => trimmed,
	};

	format!(
		r#"User request: "{user_query}"

{instructions}

Retrieved résumés:
{context}

Your task:
1. Judge how relevant each résumé is to the request "{user_query}".
2. Keep only the résumés that genuinely fit.
3. List the numbers of the chosen résumés (for example: 1, 3, 5).
4. Give a short justification for each chosen résumé.
5. If none fit, say so.

IMPORTANT: cite only real résumé numbers from the list above (1, 2, 3...).

Answer format:
**Analysis:**
[résumé numbers separated by commas] - short justification.

**Matching candidates:**
Résumé #[number]: position, location, experience, key skills"#
	)
}
