pub mod completion;
pub mod planner;
pub mod retrieval;
pub mod selection;

mod error;

pub use error::{Error, Result};
pub use retrieval::Retrieval;
pub use selection::Selection;

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use scout_config::Config;
use scout_domain::{answer, filter};
use scout_providers::{CompletionProvider, EmbeddingProvider, HttpProviders};
use scout_storage::VectorStore;

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub completion: Arc<dyn CompletionProvider>,
}
impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		completion: Arc<dyn CompletionProvider>,
	) -> Self {
		Self { embedding, completion }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(HttpProviders);

		Self { embedding: provider.clone(), completion: provider }
	}
}

pub struct ScoutService {
	pub cfg: Config,
	pub store: Arc<dyn VectorStore>,
	pub providers: Providers,
}
impl ScoutService {
	pub fn new(cfg: Config, store: Arc<dyn VectorStore>) -> Self {
		Self { cfg, store, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, store: Arc<dyn VectorStore>, providers: Providers) -> Self {
		Self { cfg, store, providers }
	}

	/// Answers a hiring query end to end.
	///
	/// Only an exhausted completion service is an error. Retrieval problems degrade into fewer
	/// candidates or the no-match answer.
	pub async fn process_query(&self, user_query: &str) -> Result<String> {
		let trace_id = Uuid::new_v4();

		self.run_pipeline(user_query).instrument(tracing::info_span!("query", %trace_id)).await
	}

	pub async fn profile_count(&self) -> Result<u64> {
		Ok(self.store.count().await?)
	}

	async fn run_pipeline(&self, user_query: &str) -> Result<String> {
		let parsed = self.plan(user_query).await?;
		let intent = parsed.intent;
		let (store_filter, soft_skills) = filter::build_filters(&intent);

		tracing::info!(
			store_filter = %store_filter.to_value(),
			soft_skills = ?soft_skills.terms(),
			"Filters built."
		);

		let retrieval = self
			.retrieve(
				&intent.search_queries,
				&store_filter,
				&soft_skills,
				self.cfg.search.max_results as usize,
			)
			.await;

		if retrieval.candidates.is_empty() {
			tracing::info!("No candidates retrieved.");

			return Ok(answer::no_matches(user_query));
		}

		let selection =
			self.select(user_query, &intent.analysis_instructions, &retrieval.candidates).await?;

		tracing::info!(
			candidates = retrieval.candidates.len(),
			selected = ?selection.selected,
			"Query answered."
		);

		Ok(answer::compose(
			user_query,
			&selection.analysis,
			&retrieval.candidates,
			&selection.selected,
		))
	}
}
