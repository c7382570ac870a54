use axum::{
	Json, Router,
	extract::{Path, State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use advisor_service::{Context, Error, RecommendationOutput, RecommendationRequest};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/recommendations", post(recommendations))
		.route("/v1/clients/{client_id}/context", get(client_context))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn recommendations(
	State(state): State<AppState>,
	payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<RecommendationOutput>, ApiError> {
	let Json(payload) = payload.map_err(|rejection| {
		json_error(StatusCode::BAD_REQUEST, "invalid_request", rejection.body_text(), None)
	})?;
	let response = state.service.generate_product_recommendations(payload).await?;

	Ok(Json(response))
}

async fn client_context(
	State(state): State<AppState>,
	Path(client_id): Path<String>,
) -> Result<Json<Context>, ApiError> {
	let response = state.service.get_current_database_context(&client_id).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::Validation { field, expected } => json_error(
				StatusCode::UNPROCESSABLE_ENTITY,
				"invalid_changes",
				format!("Invalid change payload at {field}: expected {expected}."),
				Some(vec![field]),
			),
			Error::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "not_found", message, None),
			Error::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message, None),
			Error::Storage { message } => {
				tracing::error!(error = %message, "Storage failure while serving request.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"storage_error",
					"The client store is unavailable.",
					None,
				)
			},
			Error::Provider { message } =>
				json_error(StatusCode::BAD_GATEWAY, "provider_error", message, None),
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError { status, error_code: code.to_string(), message: message.into(), fields }
}
