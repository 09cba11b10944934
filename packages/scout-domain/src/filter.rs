use serde_json::Value;

use crate::intent::StructuredIntent;

pub const MAX_SOFT_SKILLS: usize = 3;
pub const LOCATION_FIELD: &str = "location";
pub const EXPERIENCE_MONTHS_FIELD: &str = "total_experience_months";

const NULL_SENTINELS: [&str; 2] = ["null", "none"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
	Location,
	ExperienceMonths,
}
impl FilterField {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Location => LOCATION_FIELD,
			Self::ExperienceMonths => EXPERIENCE_MONTHS_FIELD,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
	Eq { field: FilterField, value: String },
	Gte { field: FilterField, value: i64 },
}
impl Predicate {
	fn to_value(&self) -> Value {
		match self {
			Self::Eq { field, value } => {
				serde_json::json!({ "op": "eq", "field": field.as_str(), "value": value })
			},
			Self::Gte { field, value } => {
				serde_json::json!({ "op": "gte", "field": field.as_str(), "value": value })
			},
		}
	}
}

/// Conjunction of store-level predicates. No predicates matches every profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreFilter {
	predicates: Vec<Predicate>,
}
impl StoreFilter {
	pub fn match_all() -> Self {
		Self::default()
	}

	pub fn and(predicates: Vec<Predicate>) -> Self {
		Self { predicates }
	}

	pub fn predicates(&self) -> &[Predicate] {
		&self.predicates
	}

	pub fn is_match_all(&self) -> bool {
		self.predicates.is_empty()
	}

	pub fn location(&self) -> Option<&str> {
		self.predicates.iter().find_map(|predicate| match predicate {
			Predicate::Eq { field: FilterField::Location, value } => Some(value.as_str()),
			_ => None,
		})
	}

	pub fn min_experience_months(&self) -> Option<i64> {
		self.predicates.iter().find_map(|predicate| match predicate {
			Predicate::Gte { field: FilterField::ExperienceMonths, value } => Some(*value),
			_ => None,
		})
	}

	/// Evaluates the filter against a profile's scalar fields.
	pub fn matches(&self, location: &str, experience_months: u32) -> bool {
		self.predicates.iter().all(|predicate| match predicate {
			Predicate::Eq { field: FilterField::Location, value } => location == value,
			Predicate::Gte { field: FilterField::ExperienceMonths, value } =>
				i64::from(experience_months) >= *value,
			Predicate::Eq { field: FilterField::ExperienceMonths, value } =>
				experience_months.to_string() == *value,
			Predicate::Gte { field: FilterField::Location, .. } => false,
		})
	}

	pub fn to_value(&self) -> Value {
		match self.predicates.as_slice() {
			[] => serde_json::json!({ "op": "all" }),
			[single] => single.to_value(),
			many => serde_json::json!({
				"op": "and",
				"args": Value::Array(many.iter().map(Predicate::to_value).collect()),
			}),
		}
	}
}

/// Lowercase skill terms matched by substring against a profile's skills field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoftSkillSet {
	terms: Vec<String>,
}
impl SoftSkillSet {
	pub fn new<I, S>(terms: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let terms = terms
			.into_iter()
			.map(|term| term.as_ref().trim().to_lowercase())
			.filter(|term| !term.is_empty() && !is_null_sentinel(term))
			.take(MAX_SOFT_SKILLS)
			.collect();

		Self { terms }
	}

	pub fn terms(&self) -> &[String] {
		&self.terms
	}

	pub fn is_empty(&self) -> bool {
		self.terms.is_empty()
	}

	/// True when any term occurs in `skills`, or when there are no terms at all.
	pub fn matches(&self, skills: &str) -> bool {
		if self.terms.is_empty() {
			return true;
		}

		let skills = skills.to_lowercase();

		self.terms.iter().any(|term| skills.contains(term.as_str()))
	}
}

/// Splits the intent's filters into what the store can evaluate and what must be checked here.
pub fn build_filters(intent: &StructuredIntent) -> (StoreFilter, SoftSkillSet) {
	let mut predicates = Vec::new();

	if let Some(location) = intent.filters.location.as_deref().map(str::trim)
		&& !location.is_empty()
		&& !is_null_sentinel(location)
	{
		predicates.push(Predicate::Eq {
			field: FilterField::Location,
			value: location.to_lowercase(),
		});
	}
	if let Some(years) = intent.filters.min_experience_years
		&& years > 0
	{
		predicates.push(Predicate::Gte {
			field: FilterField::ExperienceMonths,
			value: i64::from(years) * 12,
		});
	}

	(StoreFilter::and(predicates), SoftSkillSet::new(&intent.filters.required_skills))
}

fn is_null_sentinel(value: &str) -> bool {
	NULL_SENTINELS.iter().any(|sentinel| value.eq_ignore_ascii_case(sentinel))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::intent::fallback_intent;

	#[test]
	fn soft_skills_skip_sentinels_before_capping() {
		let skills = SoftSkillSet::new(["React", "null", "", "TypeScript", "None", "Redux", "Jest"]);

		assert_eq!(
			skills.terms(),
			&["react".to_string(), "typescript".to_string(), "redux".to_string()]
		);
	}

	#[test]
	fn soft_skills_match_by_substring() {
		let skills = SoftSkillSet::new(["react"]);

		assert!(skills.matches("javascript, react.js, redux"));
		assert!(skills.matches("reactivity"));
		assert!(!skills.matches("vue, nuxt"));
		assert!(SoftSkillSet::default().matches(""));
	}

	#[test]
	fn zero_years_add_no_predicate() {
		let mut intent = fallback_intent();

		intent.filters.min_experience_years = Some(0);

		let (filter, _) = build_filters(&intent);

		assert!(filter.is_match_all());
	}

	#[test]
	fn filter_json_reflects_shape() {
		assert_eq!(StoreFilter::match_all().to_value(), serde_json::json!({ "op": "all" }));

		let filter = StoreFilter::and(vec![
			Predicate::Eq { field: FilterField::Location, value: "москва".to_string() },
			Predicate::Gte { field: FilterField::ExperienceMonths, value: 36 },
		]);

		assert_eq!(filter.to_value()["op"], "and");
		assert_eq!(filter.to_value()["args"][1]["field"], "total_experience_months");
		assert!(filter.matches("москва", 40));
		assert!(!filter.matches("москва", 35));
		assert!(!filter.matches("казань", 40));
	}
}
