use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use scout_domain::{answer, query_gate};
use scout_service::Error;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
	pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
	pub answer: String,
	pub truncated: bool,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
	pub profiles: u64,
	pub embedding_model: String,
	pub completion_model: String,
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/search", post(search))
		.route("/v1/stats", get(stats))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let gate = &state.service.cfg.service.query_gate;

	if let Err(rejection) =
		query_gate::check_query(&payload.query, gate.min_query_chars as usize, &gate.blocked_words)
	{
		tracing::info!(code = rejection.code(), "Query rejected at the gate.");

		return Err(json_error(StatusCode::BAD_REQUEST, rejection.code(), rejection.message()));
	}

	let full = state.service.process_query(payload.query.trim()).await?;
	let (answer, truncated) = answer::truncate_answer(&full, gate.max_answer_chars as usize);

	Ok(Json(SearchResponse { answer, truncated }))
}

async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
	let profiles = state.service.profile_count().await?;
	let providers = &state.service.cfg.providers;

	Ok(Json(StatsResponse {
		profiles,
		embedding_model: providers.embedding.model.clone(),
		completion_model: providers.llm.model.clone(),
	}))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		tracing::error!(error = %err, "Request failed.");

		match err {
			Error::CompletionExhausted { .. } => json_error(
				StatusCode::BAD_GATEWAY,
				"COMPLETION_UNAVAILABLE",
				"The language model is unavailable. Try again later.",
			),
			Error::Storage { .. } => json_error(
				StatusCode::SERVICE_UNAVAILABLE,
				"STORAGE_UNAVAILABLE",
				"The résumé store is unavailable. Try again later.",
			),
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError::new(status, code, message)
}
