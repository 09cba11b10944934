//! Qdrant-backed profile store.
//!
//! Each point carries the profile document and its metadata in the payload.

pub const ID_KEY: &str = "id";
pub const URL_KEY: &str = "url";
pub const POSITION_KEY: &str = "desired_position";
pub const POSITION_ALIAS_KEY: &str = "position";
pub const SKILLS_KEY: &str = "all_skills";
pub const DOCUMENT_KEY: &str = "document";

use std::collections::HashMap;

use qdrant_client::qdrant::{
	Condition, CountPointsBuilder, Filter, PointId, Query, QueryPointsBuilder, Range,
	ScoredPoint, Value, point_id::PointIdOptions, value::Kind,
};

use scout_domain::{
	candidate::StoreHit,
	filter::{EXPERIENCE_MONTHS_FIELD, LOCATION_FIELD, Predicate, StoreFilter},
};

use crate::{BoxFuture, Error, Result, VectorStore};

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
	pub vector_name: Option<String>,
}
impl QdrantStore {
	pub fn new(cfg: &scout_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self {
			client,
			collection: cfg.collection.clone(),
			vector_dim: cfg.vector_dim,
			vector_name: cfg.vector_name.clone(),
		})
	}

	async fn search(
		&self,
		embedding: &[f32],
		top_k: u32,
		filter: &StoreFilter,
	) -> Result<Vec<StoreHit>> {
		if embedding.len() != self.vector_dim as usize {
			return Err(Error::InvalidArgument(format!(
				"Query vector has {} dimensions; the collection expects {}.",
				embedding.len(),
				self.vector_dim
			)));
		}

		let mut search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(embedding.to_vec()))
			.with_payload(true)
			.limit(u64::from(top_k));

		if let Some(name) = self.vector_name.as_deref() {
			search = search.using(name);
		}
		if let Some(filter) = to_qdrant_filter(filter) {
			search = search.filter(filter);
		}

		let response = self.client.query(search).await?;

		Ok(response.result.into_iter().filter_map(hit_from_point).collect())
	}

	async fn count_points(&self) -> Result<u64> {
		let response =
			self.client.count(CountPointsBuilder::new(self.collection.clone()).exact(true)).await?;

		Ok(response.result.map(|result| result.count).unwrap_or(0))
	}
}
impl VectorStore for QdrantStore {
	fn query<'a>(
		&'a self,
		embedding: &'a [f32],
		top_k: u32,
		filter: &'a StoreFilter,
	) -> BoxFuture<'a, Result<Vec<StoreHit>>> {
		Box::pin(self.search(embedding, top_k, filter))
	}

	fn count(&self) -> BoxFuture<'_, Result<u64>> {
		Box::pin(self.count_points())
	}
}

/// Translates the filter into Qdrant's form. `None` means no filtering at all.
pub fn to_qdrant_filter(filter: &StoreFilter) -> Option<Filter> {
	if filter.is_match_all() {
		return None;
	}

	let conditions = filter.predicates().iter().map(|predicate| match predicate {
		Predicate::Eq { field, value } => Condition::matches(field.as_str(), value.clone()),
		Predicate::Gte { field, value } => Condition::range(
			field.as_str(),
			Range { gte: Some(*value as f64), ..Default::default() },
		),
	});

	Some(Filter::must(conditions))
}

/// Reads a scored point into a hit. Points with no usable id are dropped.
pub fn hit_from_point(point: ScoredPoint) -> Option<StoreHit> {
	let payload = &point.payload;
	let id = payload_string(payload, ID_KEY)
		.filter(|id| !id.trim().is_empty())
		.or_else(|| point.id.as_ref().and_then(point_id_to_string))?;

	Some(StoreHit {
		id,
		url: payload_string(payload, URL_KEY).unwrap_or_default(),
		position: payload_string(payload, POSITION_KEY)
			.or_else(|| payload_string(payload, POSITION_ALIAS_KEY))
			.unwrap_or_default(),
		location: payload_string(payload, LOCATION_FIELD).unwrap_or_default(),
		experience_months: payload_u32(payload, EXPERIENCE_MONTHS_FIELD).unwrap_or(0),
		skills: payload_string(payload, SKILLS_KEY).unwrap_or_default(),
		document: payload_string(payload, DOCUMENT_KEY).unwrap_or_default(),
	})
}

fn point_id_to_string(point_id: &PointId) -> Option<String> {
	match &point_id.point_id_options {
		Some(PointIdOptions::Uuid(id)) => Some(id.clone()),
		Some(PointIdOptions::Num(id)) => Some(id.to_string()),
		None => None,
	}
}

fn payload_string(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	let value = payload.get(key)?;

	match &value.kind {
		Some(Kind::StringValue(text)) => Some(text.to_string()),
		_ => None,
	}
}

fn payload_u32(payload: &HashMap<String, Value>, key: &str) -> Option<u32> {
	let value = payload.get(key)?;

	match &value.kind {
		Some(Kind::IntegerValue(value)) => u32::try_from(*value).ok(),
		Some(Kind::DoubleValue(value)) =>
			if value.is_finite() && *value >= 0.0 && *value <= f64::from(u32::MAX) {
				Some(value.trunc() as u32)
			} else {
				None
			},
		Some(Kind::StringValue(text)) => text.trim().parse().ok(),
		_ => None,
	}
}
