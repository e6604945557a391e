use std::convert::Infallible;

use axum::{
	Json, Router,
	extract::{
		Path, Query, State,
		rejection::{JsonRejection, QueryRejection},
	},
	http::{StatusCode, header},
	response::{
		IntoResponse, Response,
		sse::{Event, KeepAlive, Sse},
	},
	routing::{get, post},
};
use serde::Serialize;
use tokio_stream::{Stream, StreamExt};

use crate::{csv, state::AppState};
use noteboard_domain::{Note, Project};
use noteboard_service::{Error as ServiceError, UpdatesRequest, UpdatesResponse};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/projects", get(list_projects).post(add_project))
		.route("/project/{pr}", get(get_project))
		.route("/project/{pr}/notes", post(add_note))
		.route("/project/{pr}/updates", get(updates))
		.route("/project/{pr}/export", get(export))
		.route("/stream", get(stream))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn list_projects(State(state): State<AppState>) -> Json<Vec<Project>> {
	Json(state.service.list_projects().to_vec())
}

async fn get_project(
	State(state): State<AppState>,
	Path(pr): Path<String>,
) -> Result<Json<Project>, ApiError> {
	Ok(Json(state.service.get_project(&pr)?))
}

async fn add_project(
	State(state): State<AppState>,
	payload: Result<Json<Project>, JsonRejection>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
	let Json(project) = payload.map_err(ApiError::from_json_rejection)?;
	let project = state.service.add_project(project).await?;

	Ok((StatusCode::CREATED, Json(project)))
}

#[derive(Debug, Serialize)]
struct AddNoteResponse {
	message: &'static str,
	project: Project,
}

async fn add_note(
	State(state): State<AppState>,
	Path(pr): Path<String>,
	payload: Result<Json<Note>, JsonRejection>,
) -> Result<(StatusCode, Json<AddNoteResponse>), ApiError> {
	let Json(note) = payload.map_err(ApiError::from_json_rejection)?;
	let project = state.service.add_note(&pr, note).await?;

	Ok((StatusCode::CREATED, Json(AddNoteResponse { message: "Note added", project })))
}

async fn updates(
	State(state): State<AppState>,
	Path(pr): Path<String>,
	query: Result<Query<UpdatesRequest>, QueryRejection>,
) -> Result<Json<UpdatesResponse>, ApiError> {
	let Query(req) = query.map_err(|err| {
		json_error(StatusCode::BAD_REQUEST, "invalid_request", err.body_text(), None)
	})?;

	Ok(Json(state.service.get_updates_in_range(&pr, &req)?))
}

async fn export(
	State(state): State<AppState>,
	Path(pr): Path<String>,
	query: Result<Query<UpdatesRequest>, QueryRejection>,
) -> Result<Response, ApiError> {
	let Query(req) = query.map_err(|err| {
		json_error(StatusCode::BAD_REQUEST, "invalid_request", err.body_text(), None)
	})?;
	let rows = state.service.export_updates_in_range(&pr, &req)?;
	let disposition = format!("attachment; filename=\"{}\"", csv::file_name(&pr));

	Ok((
		[
			(header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
			(header::CONTENT_DISPOSITION, disposition),
		],
		csv::render(&rows),
	)
		.into_response())
}

/// Streams every published snapshot as a `projects` event until the client goes away. Dropping
/// the stream drops the subscription, which unsubscribes it. A client that falls behind is
/// evicted and its stream ends, so it reconnects and refetches `/projects`.
async fn stream(
	State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
	let subscription = state.service.subscribe();

	tracing::debug!(subscriber = subscription.id(), "Stream opened.");

	let events =
		subscription.map(|payload| Ok(Event::default().event("projects").data(&*payload)));

	Sse::new(events).keep_alive(KeepAlive::new().interval(state.keep_alive))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}

	fn from_json_rejection(err: JsonRejection) -> Self {
		json_error(StatusCode::BAD_REQUEST, "invalid_request", err.body_text(), None)
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message, None),
			ServiceError::MissingFields { ref fields } => json_error(
				StatusCode::BAD_REQUEST,
				"missing_fields",
				err.to_string(),
				Some(fields.clone()),
			),
			ServiceError::InvalidDate { .. } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_date", err.to_string(), None),
			ServiceError::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "not_found", message, None),
			ServiceError::NoUpdates { .. } =>
				json_error(StatusCode::NOT_FOUND, "no_updates", err.to_string(), None),
			ServiceError::Conflict { message } =>
				json_error(StatusCode::CONFLICT, "conflict", message, None),
			ServiceError::CorruptData { message } => {
				tracing::error!(%message, "Project document is corrupt.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, "corrupt_data", message, None)
			},
			ServiceError::Storage { message } => {
				tracing::error!(%message, "Storage failure.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message, None)
			},
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
