//! Axum route handlers for the Resume API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::models::resume::Resume;
use crate::resumes::dto::ResumeCreationRequest;
use crate::state::AppState;

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Json(request): Json<ResumeCreationRequest>,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    let resume = state.resumes.create_resume(request).await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<Resume>>, AppError> {
    Ok(Json(state.resumes.get_all_resumes().await?))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(state.resumes.get_resume_by_id(id).await?))
}

/// PUT /api/v1/resumes/:id
///
/// The path id overrides whatever id the body carries.
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(mut resume): Json<Resume>,
) -> Result<Json<Resume>, AppError> {
    resume.id = Some(id);
    Ok(Json(state.resumes.update_resume(resume).await?))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.resumes.delete_resume_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
