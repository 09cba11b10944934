mod collection;
mod error;

pub use collection::TestCollection;
pub use error::{Error, Result};

use std::{
	collections::VecDeque,
	env,
	sync::{
		Mutex,
		atomic::{AtomicUsize, Ordering},
	},
};

use serde_json::{Map, Value};

use scout_config::{
	Config, EmbeddingProviderConfig, LlmProviderConfig, Planner, Providers, Qdrant, QueryGate,
	Search, Selection, Service, Storage,
};
use scout_domain::{candidate::StoreHit, filter::StoreFilter};
use scout_providers::{BoxFuture, CompletionProvider, EmbeddingProvider};
use scout_storage::VectorStore;

/// Embeds text as keyword presence over a fixed vocabulary plus a constant bias component.
pub struct KeywordEmbedding {
	vocabulary: Vec<String>,
	fail_on: Option<String>,
	calls: AtomicUsize,
}
impl KeywordEmbedding {
	pub fn new<I, S>(vocabulary: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			vocabulary: vocabulary.into_iter().map(|term| term.into().to_lowercase()).collect(),
			fail_on: None,
			calls: AtomicUsize::new(0),
		}
	}

	/// Makes every batch containing `text` fail.
	pub fn failing_on(mut self, text: &str) -> Self {
		self.fail_on = Some(text.to_string());

		self
	}

	pub fn dim(&self) -> u32 {
		self.vocabulary.len() as u32 + 1
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn vector(&self, text: &str) -> Vec<f32> {
		let lowered = text.to_lowercase();
		let mut vector: Vec<f32> = self
			.vocabulary
			.iter()
			.map(|term| if lowered.contains(term.as_str()) { 1.0 } else { 0.0 })
			.collect();

		vector.push(0.1);

		vector
	}
}
impl EmbeddingProvider for KeywordEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, scout_providers::Result<Vec<Vec<f32>>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let result = if self.fail_on.as_ref().is_some_and(|bad| texts.contains(bad)) {
			Err(scout_providers::Error::InvalidResponse {
				message: "Embedding service rejected the batch.".to_string(),
			})
		} else {
			Ok(texts.iter().map(|text| self.vector(text)).collect())
		};

		Box::pin(async move { result })
	}
}

/// Replays canned completion outcomes in order, recording every request.
pub struct ScriptedCompletion {
	script: Mutex<VecDeque<Result<String, String>>>,
	requests: Mutex<Vec<Vec<Value>>>,
}
impl ScriptedCompletion {
	pub fn new<I>(script: I) -> Self
	where
		I: IntoIterator<Item = Result<&'static str, &'static str>>,
	{
		let script = script
			.into_iter()
			.map(|step| step.map(str::to_string).map_err(str::to_string))
			.collect();

		Self { script: Mutex::new(script), requests: Mutex::new(Vec::new()) }
	}

	pub fn calls(&self) -> usize {
		self.requests.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	/// User message content of every request so far.
	pub fn user_prompts(&self) -> Vec<String> {
		self.requests
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.iter()
			.filter_map(|messages| {
				messages
					.iter()
					.find(|message| message["role"] == "user")
					.and_then(|message| message["content"].as_str())
					.map(str::to_string)
			})
			.collect()
	}
}
impl CompletionProvider for ScriptedCompletion {
	fn complete<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, scout_providers::Result<String>> {
		self.requests.lock().unwrap_or_else(|err| err.into_inner()).push(messages.to_vec());

		let step = self.script.lock().unwrap_or_else(|err| err.into_inner()).pop_front();
		let result = match step {
			Some(Ok(text)) => Ok(text),
			Some(Err(message)) => Err(scout_providers::Error::InvalidResponse { message }),
			None => Err(scout_providers::Error::InvalidResponse {
				message: "Completion script is exhausted.".to_string(),
			}),
		};

		Box::pin(async move { result })
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCall {
	pub top_k: u32,
	pub filter: StoreFilter,
}

/// Brute-force vector store over seeded profiles, ranked by dot product.
pub struct InMemoryStore {
	profiles: Vec<(StoreHit, Vec<f32>)>,
	calls: Mutex<Vec<StoreCall>>,
	unavailable: bool,
}
impl InMemoryStore {
	/// Embeds each profile's position, skills and document with `embedding`.
	pub fn seeded(embedding: &KeywordEmbedding, profiles: Vec<StoreHit>) -> Self {
		let profiles = profiles
			.into_iter()
			.map(|hit| {
				let vector = embedding
					.vector(&format!("{} {} {}", hit.position, hit.skills, hit.document));

				(hit, vector)
			})
			.collect();

		Self { profiles, calls: Mutex::new(Vec::new()), unavailable: false }
	}

	/// A store whose every call fails.
	pub fn unavailable() -> Self {
		Self { profiles: Vec::new(), calls: Mutex::new(Vec::new()), unavailable: true }
	}

	pub fn calls(&self) -> Vec<StoreCall> {
		self.calls.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	fn ranked(&self, embedding: &[f32], top_k: u32, filter: &StoreFilter) -> Vec<StoreHit> {
		let mut scored: Vec<(f32, &StoreHit)> = self
			.profiles
			.iter()
			.filter(|(hit, _)| filter.matches(&hit.location, hit.experience_months))
			.map(|(hit, vector)| {
				(vector.iter().zip(embedding).map(|(left, right)| left * right).sum(), hit)
			})
			.collect();

		scored.sort_by(|left, right| right.0.total_cmp(&left.0));

		scored.into_iter().take(top_k as usize).map(|(_, hit)| hit.clone()).collect()
	}
}
impl VectorStore for InMemoryStore {
	fn query<'a>(
		&'a self,
		embedding: &'a [f32],
		top_k: u32,
		filter: &'a StoreFilter,
	) -> scout_storage::BoxFuture<'a, scout_storage::Result<Vec<StoreHit>>> {
		self.calls
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.push(StoreCall { top_k, filter: filter.clone() });

		let result = if self.unavailable {
			Err(scout_storage::Error::InvalidArgument("Store is unavailable.".to_string()))
		} else {
			Ok(self.ranked(embedding, top_k, filter))
		};

		Box::pin(async move { result })
	}

	fn count(&self) -> scout_storage::BoxFuture<'_, scout_storage::Result<u64>> {
		let result = if self.unavailable {
			Err(scout_storage::Error::InvalidArgument("Store is unavailable.".to_string()))
		} else {
			Ok(self.profiles.len() as u64)
		};

		Box::pin(async move { result })
	}
}

pub fn env_qdrant_url() -> Option<String> {
	env::var("SCOUT_QDRANT_URL").ok()
}

/// A valid configuration whose providers point nowhere and whose retry delay is short.
pub fn test_config(vector_dim: u32) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
			query_gate: QueryGate {
				min_query_chars: 3,
				blocked_words: vec!["spam".to_string()],
				max_answer_chars: 4_000,
			},
		},
		storage: Storage {
			qdrant: Qdrant {
				url: "http://127.0.0.1:6334".to_string(),
				collection: "profiles_test".to_string(),
				vector_dim,
				vector_name: None,
			},
		},
		providers: Providers {
			embedding: dummy_embedding_provider(vector_dim),
			llm: dummy_llm_provider(),
		},
		planner: Planner { max_attempts: 3, retry_delay_ms: 5 },
		search: Search::default(),
		selection: Selection::default(),
	}
}

pub fn dummy_embedding_provider(dimensions: u32) -> EmbeddingProviderConfig {
	EmbeddingProviderConfig {
		provider_id: "test".to_string(),
		api_base: "http://127.0.0.1:1".to_string(),
		api_key: "test-key".to_string(),
		path: "/".to_string(),
		model: "test-embedding".to_string(),
		dimensions,
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

pub fn dummy_llm_provider() -> LlmProviderConfig {
	LlmProviderConfig {
		provider_id: "test".to_string(),
		api_base: "http://127.0.0.1:1".to_string(),
		api_key: "test-key".to_string(),
		path: "/".to_string(),
		model: "test-chat".to_string(),
		temperature: 0.3,
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

/// Profile fixture with the metadata the store indexes.
pub fn profile(
	id: &str,
	position: &str,
	location: &str,
	experience_months: u32,
	skills: &str,
) -> StoreHit {
	StoreHit {
		id: id.to_string(),
		url: format!("https://resumes.example.com/{id}"),
		position: position.to_string(),
		location: location.to_string(),
		experience_months,
		skills: skills.to_string(),
		document: format!("{position} with {skills}."),
	}
}
