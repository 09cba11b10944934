//! Two-phase multi-query retrieval.
//!
//! Phase 1 searches every sub-query under the store filter and keeps only hits that carry one of
//! the soft skills. Phase 2 runs only when Phase 1 filled less than half of the result budget; it
//! repeats the sub-queries without the skill check and tops up the same session.

use std::collections::HashSet;

use scout_domain::{
	candidate::{Candidate, StoreHit},
	filter::{SoftSkillSet, StoreFilter},
};

use crate::ScoutService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retrieval {
	/// Unique by id, in first-seen order.
	pub candidates: Vec<Candidate>,
	pub strict_count: usize,
	pub fallback_ran: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
	Strict,
	Fallback,
}
impl Phase {
	fn as_str(self) -> &'static str {
		match self {
			Self::Strict => "strict",
			Self::Fallback => "fallback",
		}
	}
}

/// Accumulates candidates for one query.
struct SearchSession {
	candidates: Vec<Candidate>,
	seen: HashSet<String>,
	max_results: usize,
	phase: Phase,
}
impl SearchSession {
	fn new(max_results: usize) -> Self {
		Self { candidates: Vec::new(), seen: HashSet::new(), max_results, phase: Phase::Strict }
	}

	fn is_full(&self) -> bool {
		self.candidates.len() >= self.max_results
	}

	fn contains(&self, id: &str) -> bool {
		self.seen.contains(id)
	}

	/// Takes the candidate unless its id was already admitted or the session is full.
	fn admit(&mut self, candidate: Candidate) -> bool {
		if self.is_full() || !self.seen.insert(candidate.id.clone()) {
			return false;
		}

		self.candidates.push(candidate);

		true
	}

	/// Offers store hits in rank order. In the strict phase only hits matching `soft_skills` count.
	fn offer(&mut self, hits: Vec<StoreHit>, soft_skills: &SoftSkillSet) {
		for hit in hits {
			if self.is_full() {
				break;
			}

			let Some(candidate) = Candidate::from_hit(hit) else {
				continue;
			};

			if self.contains(&candidate.id) {
				continue;
			}
			if self.phase == Phase::Strict && !soft_skills.matches(&candidate.skills) {
				continue;
			}

			self.admit(candidate);
		}
	}
}

impl ScoutService {
	pub async fn retrieve(
		&self,
		search_queries: &[String],
		store_filter: &StoreFilter,
		soft_skills: &SoftSkillSet,
		max_results: usize,
	) -> Retrieval {
		let search = &self.cfg.search;
		let budget = u32::try_from(max_results).unwrap_or(u32::MAX);
		let strict_k = search.strict_k_cap.min(budget.saturating_mul(search.strict_k_multiplier));
		let fallback_k =
			search.fallback_k_cap.min(budget.saturating_mul(search.fallback_k_multiplier));
		let mut session = SearchSession::new(max_results);
		let mut vectors: Vec<Option<Vec<f32>>> = Vec::with_capacity(search_queries.len());

		for query in search_queries {
			if session.is_full() {
				break;
			}

			let vector = self.embed_query(query).await;

			if let Some(vector) = vector.as_deref() {
				let hits = self.query_store(query, vector, strict_k, store_filter, Phase::Strict).await;

				session.offer(hits, soft_skills);
			}

			vectors.push(vector);
		}

		let strict_count = session.candidates.len();
		let fallback_ran = strict_count < max_results / 2;

		tracing::info!(
			strict_count,
			max_results,
			top_k = strict_k,
			"Strict retrieval finished."
		);

		if fallback_ran {
			session.phase = Phase::Fallback;

			for (index, query) in search_queries.iter().enumerate() {
				if session.is_full() {
					break;
				}

				let vector = match vectors.get(index) {
					Some(cached) => cached.clone(),
					None => self.embed_query(query).await,
				};
				let Some(vector) = vector else {
					continue;
				};
				let hits =
					self.query_store(query, &vector, fallback_k, store_filter, Phase::Fallback).await;

				session.offer(hits, soft_skills);
			}

			tracing::info!(
				total = session.candidates.len(),
				added = session.candidates.len() - strict_count,
				top_k = fallback_k,
				"Fallback retrieval finished."
			);
		}

		Retrieval { candidates: session.candidates, strict_count, fallback_ran }
	}

	/// Embeds one sub-query. Failures are logged and yield `None`.
	async fn embed_query(&self, query: &str) -> Option<Vec<f32>> {
		let texts = [query.to_string()];
		let vector = match self.providers.embedding.embed(&self.cfg.providers.embedding, &texts).await
		{
			Ok(vectors) => vectors.into_iter().next(),
			Err(err) => {
				tracing::warn!(error = %err, query, "Embedding failed. Skipping sub-query.");

				return None;
			},
		};
		let Some(vector) = vector else {
			tracing::warn!(query, "Embedding provider returned no vectors. Skipping sub-query.");

			return None;
		};

		if vector.len() != self.cfg.storage.qdrant.vector_dim as usize {
			tracing::warn!(
				query,
				dim = vector.len(),
				expected = self.cfg.storage.qdrant.vector_dim,
				"Embedding vector dimension mismatch. Skipping sub-query."
			);

			return None;
		}

		Some(vector)
	}

	async fn query_store(
		&self,
		query: &str,
		vector: &[f32],
		top_k: u32,
		store_filter: &StoreFilter,
		phase: Phase,
	) -> Vec<StoreHit> {
		match self.store.query(vector, top_k, store_filter).await {
			Ok(hits) => {
				tracing::debug!(query, phase = phase.as_str(), hits = hits.len(), "Store queried.");

				hits
			},
			Err(err) => {
				tracing::warn!(
					error = %err,
					query,
					phase = phase.as_str(),
					"Store query failed. Skipping sub-query."
				);

				Vec::new()
			},
		}
	}
}
