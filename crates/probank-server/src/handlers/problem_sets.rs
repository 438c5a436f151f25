//! Problem-set handlers (index, show, create, update, delete, members).

use axum::extract::{Path, State};
use axum::Json;

use probank_core::ProblemSet;

use crate::error::ApiError;
use crate::schema::problem_sets::{
    ProblemSetListResponse, ProblemSetMembersResponse, ProblemSetPayload,
};
use crate::state::AppState;
use crate::validation;

/// Lists all problem sets, newest first.
///
/// `GET /problem-sets`
pub async fn index(
    State(state): State<AppState>,
) -> Result<Json<ProblemSetListResponse>, ApiError> {
    let service = state.service.lock().await;
    let problem_sets = service.list_problem_sets()?;
    Ok(Json(ProblemSetListResponse { problem_sets }))
}

/// Shows a single problem set by store id.
///
/// `GET /problem-sets/{set_id}`
pub async fn show(
    State(state): State<AppState>,
    Path(set_id): Path<String>,
) -> Result<Json<ProblemSet>, ApiError> {
    validation::validate_identifier("set_id", &set_id).map_err(ApiError::ValidationFailed)?;
    let service = state.service.lock().await;
    let set = service.get_problem_set(&set_id)?;
    Ok(Json(set))
}

/// Creates a problem set.
///
/// `POST /problem-sets`
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ProblemSetPayload>,
) -> Result<Json<ProblemSet>, ApiError> {
    let draft =
        validation::validate_problem_set(&payload).map_err(ApiError::ValidationFailed)?;
    let mut service = state.service.lock().await;
    let set = service.create_problem_set(&draft)?;
    Ok(Json(set))
}

/// Updates a problem set's display fields.
///
/// `PUT /problem-sets/{set_id}`
pub async fn update(
    State(state): State<AppState>,
    Path(set_id): Path<String>,
    Json(payload): Json<ProblemSetPayload>,
) -> Result<Json<ProblemSet>, ApiError> {
    validation::validate_identifier("set_id", &set_id).map_err(ApiError::ValidationFailed)?;
    let draft =
        validation::validate_problem_set(&payload).map_err(ApiError::ValidationFailed)?;
    let mut service = state.service.lock().await;
    let set = service.update_problem_set(&set_id, &draft)?;
    Ok(Json(set))
}

/// Deletes a problem set and detaches it from every problem's membership.
///
/// `DELETE /problem-sets/{set_id}`
pub async fn delete(
    State(state): State<AppState>,
    Path(set_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validation::validate_identifier("set_id", &set_id).map_err(ApiError::ValidationFailed)?;
    let mut service = state.service.lock().await;
    service.delete_problem_set(&set_id)?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Lists the problems belonging to a set.
///
/// `GET /problem-sets/{set_id}/problems`
pub async fn problems(
    State(state): State<AppState>,
    Path(set_id): Path<String>,
) -> Result<Json<ProblemSetMembersResponse>, ApiError> {
    validation::validate_identifier("set_id", &set_id).map_err(ApiError::ValidationFailed)?;
    let service = state.service.lock().await;
    let problems = service.list_problems_in_set(&set_id)?;
    Ok(Json(ProblemSetMembersResponse {
        problem_set_id: set_id,
        problems,
    }))
}
