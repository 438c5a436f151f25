//! Problem handlers (index, show, exists, create, update, delete).

use axum::extract::{Path, State};
use axum::Json;

use probank_core::Problem;

use crate::error::ApiError;
use crate::schema::problems::{ProblemListResponse, ProblemPayload};
use crate::state::AppState;
use crate::validation;

/// Lists all problems, newest first.
///
/// `GET /problems`
pub async fn index(
    State(state): State<AppState>,
) -> Result<Json<ProblemListResponse>, ApiError> {
    let service = state.service.lock().await;
    let problems = service.list_problems()?;
    Ok(Json(ProblemListResponse { problems }))
}

/// Shows a single problem by store id.
///
/// `GET /problems/{problem_id}`
pub async fn show(
    State(state): State<AppState>,
    Path(problem_id): Path<String>,
) -> Result<Json<Problem>, ApiError> {
    validation::validate_identifier("problem_id", &problem_id)
        .map_err(ApiError::ValidationFailed)?;
    let service = state.service.lock().await;
    let problem = service.get_problem(&problem_id)?;
    Ok(Json(problem))
}

/// Checks whether a problem with the given generated identity hash exists.
///
/// `GET /problems/exists/{generated_problem_id}`
///
/// Returns the problem on a hit and 404 on a miss. Clients call this before
/// creating to avoid cataloguing the same platform problem twice.
pub async fn exists(
    State(state): State<AppState>,
    Path(generated_problem_id): Path<String>,
) -> Result<Json<Problem>, ApiError> {
    validation::validate_identifier("generated_problem_id", &generated_problem_id)
        .map_err(ApiError::ValidationFailed)?;
    let service = state.service.lock().await;
    let problem = service.find_by_generated_id(&generated_problem_id)?;
    Ok(Json(problem))
}

/// Creates a problem.
///
/// `POST /problems`
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ProblemPayload>,
) -> Result<Json<Problem>, ApiError> {
    let valid = validation::validate_problem(&payload).map_err(ApiError::ValidationFailed)?;
    let mut service = state.service.lock().await;
    let problem = service.create_problem(&valid)?;
    Ok(Json(problem))
}

/// Updates a problem by store id.
///
/// `PUT /problems/{problem_id}`
pub async fn update(
    State(state): State<AppState>,
    Path(problem_id): Path<String>,
    Json(payload): Json<ProblemPayload>,
) -> Result<Json<Problem>, ApiError> {
    validation::validate_identifier("problem_id", &problem_id)
        .map_err(ApiError::ValidationFailed)?;
    let valid = validation::validate_problem(&payload).map_err(ApiError::ValidationFailed)?;
    let mut service = state.service.lock().await;
    let problem = service.update_problem(&problem_id, &valid)?;
    Ok(Json(problem))
}

/// Deletes a problem by store id.
///
/// `DELETE /problems/{problem_id}`
pub async fn delete(
    State(state): State<AppState>,
    Path(problem_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validation::validate_identifier("problem_id", &problem_id)
        .map_err(ApiError::ValidationFailed)?;
    let mut service = state.service.lock().await;
    service.delete_problem(&problem_id)?;
    Ok(Json(serde_json::json!({ "success": true })))
}
