pub mod qdrant;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxFuture<'a, T> = std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

use scout_domain::{candidate::StoreHit, filter::StoreFilter};

/// Nearest-neighbor search over embedded profile documents.
pub trait VectorStore
where
	Self: Send + Sync,
{
	/// Returns at most `top_k` hits satisfying `filter`, best match first.
	fn query<'a>(
		&'a self,
		embedding: &'a [f32],
		top_k: u32,
		filter: &'a StoreFilter,
	) -> BoxFuture<'a, Result<Vec<StoreHit>>>;

	fn count(&self) -> BoxFuture<'_, Result<u64>>;
}
