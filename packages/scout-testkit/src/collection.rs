use std::{thread, time::Duration};

use qdrant_client::{
	Payload, Qdrant,
	qdrant::{CreateCollectionBuilder, Distance, PointStruct, UpsertPointsBuilder, VectorParamsBuilder},
};
use tokio::{runtime::Builder, time};
use uuid::Uuid;

use scout_domain::candidate::StoreHit;

use crate::{Error, Result};

/// Throwaway Qdrant collection, dropped when the value goes out of scope.
pub struct TestCollection {
	client: Qdrant,
	url: String,
	name: String,
	vector_dim: u32,
	cleaned: bool,
}
impl TestCollection {
	pub async fn new(qdrant_url: &str, vector_dim: u32) -> Result<Self> {
		let client = Qdrant::from_url(qdrant_url)
			.build()
			.map_err(|err| Error::Message(format!("Failed to build Qdrant client: {err}.")))?;
		let name = format!("scout_test_{}", Uuid::new_v4().simple());
		let builder = CreateCollectionBuilder::new(name.clone())
			.vectors_config(VectorParamsBuilder::new(vector_dim.into(), Distance::Dot));

		time::timeout(Duration::from_secs(10), client.create_collection(builder))
			.await
			.map_err(|_| Error::Message("Qdrant create_collection timed out.".to_string()))??;

		Ok(Self { client, url: qdrant_url.to_string(), name, vector_dim, cleaned: false })
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn config(&self) -> scout_config::Qdrant {
		scout_config::Qdrant {
			url: self.url.clone(),
			collection: self.name.clone(),
			vector_dim: self.vector_dim,
			vector_name: None,
		}
	}

	/// Writes profiles with the payload layout the store reads back.
	pub async fn seed(&self, profiles: &[(StoreHit, Vec<f32>)]) -> Result<()> {
		let mut points = Vec::with_capacity(profiles.len());

		for (index, (hit, vector)) in profiles.iter().enumerate() {
			let mut payload = Payload::new();

			payload.insert("id", hit.id.clone());
			payload.insert("url", hit.url.clone());
			payload.insert("desired_position", hit.position.clone());
			payload.insert("location", hit.location.clone());
			payload.insert("total_experience_months", i64::from(hit.experience_months));
			payload.insert("all_skills", hit.skills.clone());
			payload.insert("document", hit.document.clone());

			points.push(PointStruct::new(index as u64 + 1, vector.clone(), payload));
		}

		self.client
			.upsert_points(UpsertPointsBuilder::new(self.name.clone(), points).wait(true))
			.await?;

		Ok(())
	}

	pub async fn cleanup(mut self) -> Result<()> {
		self.cleanup_inner().await
	}

	async fn cleanup_inner(&mut self) -> Result<()> {
		if self.cleaned {
			return Ok(());
		}

		time::timeout(Duration::from_secs(10), self.client.delete_collection(self.name.clone()))
			.await
			.map_err(|_| Error::Message("Qdrant delete_collection timed out.".to_string()))??;

		self.cleaned = true;

		Ok(())
	}
}
impl Drop for TestCollection {
	fn drop(&mut self) {
		if self.cleaned {
			return;
		}

		let url = self.url.clone();
		let name = self.name.clone();
		let cleanup_thread = thread::spawn(move || {
			let runtime = match Builder::new_current_thread().enable_all().build() {
				Ok(runtime) => runtime,
				Err(err) => {
					eprintln!("Test collection cleanup failed: {err}.");

					return;
				},
			};
			let result = runtime.block_on(async {
				let client = Qdrant::from_url(&url).build()?;

				client.delete_collection(name.clone()).await?;

				Ok::<(), qdrant_client::QdrantError>(())
			});

			if let Err(err) = result {
				eprintln!("Test collection cleanup failed for {name:?}: {err}.");
			}
		});
		let _ = cleanup_thread.join();
	}
}
