use std::sync::Arc;

use scout_domain::filter::{FilterField, Predicate, SoftSkillSet, StoreFilter};
use scout_service::{Providers, ScoutService};
use scout_storage::{VectorStore, qdrant::QdrantStore};
use scout_testkit::{KeywordEmbedding, ScriptedCompletion, TestCollection};

#[tokio::test]
#[ignore = "Requires external Qdrant. Set SCOUT_QDRANT_URL to run."]
async fn qdrant_store_applies_filters_and_counts() {
	let Some(url) = scout_testkit::env_qdrant_url() else {
		eprintln!("Skipping qdrant_store_applies_filters_and_counts; set SCOUT_QDRANT_URL.");

		return;
	};
	let embedding = KeywordEmbedding::new(super::VOCABULARY);
	let collection =
		TestCollection::new(&url, embedding.dim()).await.expect("Failed to create collection.");
	let profiles = super::hiring_pool()
		.into_iter()
		.map(|hit| {
			let vector = embedding.vector(&format!("{} {} {}", hit.position, hit.skills, hit.document));

			(hit, vector)
		})
		.collect::<Vec<_>>();

	collection.seed(&profiles).await.expect("Failed to seed collection.");

	let store = Arc::new(QdrantStore::new(&collection.config()).expect("Failed to build store."));

	assert_eq!(store.count().await.expect("Count failed."), 5);

	let mut cfg = scout_testkit::test_config(embedding.dim());

	cfg.storage.qdrant = collection.config();

	let service = ScoutService::with_providers(
		cfg,
		store,
		Providers::new(Arc::new(embedding), Arc::new(ScriptedCompletion::new(vec![]))),
	);
	let filter = StoreFilter::and(vec![
		Predicate::Eq { field: FilterField::Location, value: "москва".to_string() },
		Predicate::Gte { field: FilterField::ExperienceMonths, value: 36 },
	]);
	let retrieval = service
		.retrieve(&["React developer".to_string()], &filter, &SoftSkillSet::new(["react"]), 15)
		.await;
	let mut ids: Vec<&str> = retrieval.candidates.iter().map(|c| c.id.as_str()).collect();

	ids.sort_unstable();

	assert_eq!(ids, vec!["r-1", "r-2", "r-3"]);
	assert_eq!(retrieval.strict_count, 2);

	collection.cleanup().await.expect("Failed to clean up collection.");
}
