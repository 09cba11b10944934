use serde::{Deserialize, Serialize};

/// One nearest-neighbor hit as returned by the vector store, best match first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreHit {
	pub id: String,
	pub url: String,
	pub position: String,
	pub location: String,
	pub experience_months: u32,
	/// Comma-joined skills as stored; may carry mixed case.
	pub skills: String,
	pub document: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
	pub id: String,
	pub url: String,
	pub position: String,
	pub location: String,
	pub experience_months: u32,
	pub skills: String,
	pub text: String,
}
impl Candidate {
	/// Returns `None` for hits without an id since they cannot be deduplicated.
	pub fn from_hit(hit: StoreHit) -> Option<Self> {
		let id = hit.id.trim();

		if id.is_empty() {
			return None;
		}

		Some(Self {
			id: id.to_string(),
			url: hit.url.trim().to_string(),
			position: hit.position,
			location: hit.location,
			experience_months: hit.experience_months,
			skills: hit.skills.to_lowercase(),
			text: hit.document,
		})
	}

	pub fn experience_years(&self) -> u32 {
		self.experience_months / 12
	}
}
