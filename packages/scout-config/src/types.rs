use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub planner: Planner,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub selection: Selection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	#[serde(default)]
	pub query_gate: QueryGate,
}

/// Front-door checks applied before a query reaches the pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryGate {
	pub min_query_chars: u32,
	/// Case-insensitive substrings that cause a query to be rejected.
	pub blocked_words: Vec<String>,
	/// Answers longer than this many characters are cut with a truncation marker.
	pub max_answer_chars: u32,
}
impl Default for QueryGate {
	fn default() -> Self {
		Self { min_query_chars: 3, blocked_words: Vec::new(), max_answer_chars: 4_000 }
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub qdrant: Qdrant,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
	/// Optional. Name of the dense vector when the collection uses named vectors.
	pub vector_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub llm: LlmProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Planner {
	pub max_attempts: u32,
	pub retry_delay_ms: u64,
}
impl Default for Planner {
	fn default() -> Self {
		Self { max_attempts: 3, retry_delay_ms: 1_000 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Search {
	pub max_results: u32,
	pub strict_k_cap: u32,
	pub strict_k_multiplier: u32,
	pub fallback_k_cap: u32,
	pub fallback_k_multiplier: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			max_results: 15,
			strict_k_cap: 20,
			strict_k_multiplier: 3,
			fallback_k_cap: 15,
			fallback_k_multiplier: 2,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Selection {
	pub skills_excerpt_chars: u32,
	pub text_excerpt_chars: u32,
}
impl Default for Selection {
	fn default() -> Self {
		Self { skills_excerpt_chars: 150, text_excerpt_chars: 300 }
	}
}
