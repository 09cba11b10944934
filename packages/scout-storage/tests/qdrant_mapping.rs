use std::collections::HashMap;

use qdrant_client::qdrant::{
	PointId, ScoredPoint, Value, condition::ConditionOneOf, r#match::MatchValue,
};

use scout_domain::filter::{FilterField, Predicate, StoreFilter};
use scout_storage::qdrant::{self, QdrantStore};

fn field_key(condition: &qdrant_client::qdrant::Condition) -> Option<&str> {
	match condition.condition_one_of.as_ref()? {
		ConditionOneOf::Field(field) => Some(field.key.as_str()),
		_ => None,
	}
}

fn point(id: u64, payload: &[(&str, Value)]) -> ScoredPoint {
	ScoredPoint {
		id: Some(PointId::from(id)),
		payload: payload
			.iter()
			.map(|(key, value)| (key.to_string(), value.clone()))
			.collect::<HashMap<_, _>>(),
		score: 0.9,
		..Default::default()
	}
}

#[test]
fn match_all_filter_is_omitted() {
	assert!(qdrant::to_qdrant_filter(&StoreFilter::match_all()).is_none());
}

#[test]
fn predicates_become_must_conditions() {
	let filter = StoreFilter::and(vec![
		Predicate::Eq { field: FilterField::Location, value: "москва".to_string() },
		Predicate::Gte { field: FilterField::ExperienceMonths, value: 36 },
	]);
	let converted = qdrant::to_qdrant_filter(&filter).expect("Expected a filter.");

	assert_eq!(converted.must.len(), 2);
	assert_eq!(field_key(&converted.must[0]), Some("location"));
	assert_eq!(field_key(&converted.must[1]), Some("total_experience_months"));

	let Some(ConditionOneOf::Field(location)) = converted.must[0].condition_one_of.as_ref() else {
		panic!("Expected a field condition.");
	};
	let matched = location.r#match.as_ref().and_then(|m| m.match_value.as_ref());

	assert_eq!(matched, Some(&MatchValue::Keyword("москва".to_string())));

	let Some(ConditionOneOf::Field(experience)) = converted.must[1].condition_one_of.as_ref()
	else {
		panic!("Expected a field condition.");
	};
	let range = experience.range.as_ref().expect("Expected a range.");

	assert_eq!(range.gte, Some(36.0));
	assert_eq!(range.lt, None);
}

#[test]
fn payload_fields_map_onto_hit() {
	let hit = qdrant::hit_from_point(point(
		7,
		&[
			("id", Value::from("r-7")),
			("url", Value::from("https://example.com/r/7")),
			("position", Value::from("Frontend developer")),
			("location", Value::from("москва")),
			("total_experience_months", Value::from(48_i64)),
			("all_skills", Value::from("React, Redux")),
			("document", Value::from("Builds dashboards.")),
		],
	))
	.expect("Expected a hit.");

	assert_eq!(hit.id, "r-7");
	assert_eq!(hit.position, "Frontend developer");
	assert_eq!(hit.experience_months, 48);
	assert_eq!(hit.skills, "React, Redux");
	assert_eq!(hit.document, "Builds dashboards.");
}

#[test]
fn point_id_stands_in_for_missing_payload_id() {
	let hit = qdrant::hit_from_point(point(11, &[("total_experience_months", Value::from(-3_i64))]))
		.expect("Expected a hit.");

	assert_eq!(hit.id, "11");
	assert_eq!(hit.experience_months, 0);
	assert!(hit.url.is_empty());
}

#[test]
fn store_builds_without_connecting() {
	let cfg = scout_config::Qdrant {
		url: "http://127.0.0.1:6334".to_string(),
		collection: "profiles".to_string(),
		vector_dim: 4,
		vector_name: Some("dense".to_string()),
	};
	let store = QdrantStore::new(&cfg).expect("Failed to build store.");

	assert_eq!(store.collection, "profiles");
	assert_eq!(store.vector_name.as_deref(), Some("dense"));
}
