//! Exam handlers

use crate::{
    api::extractors::{JsonBody, Pagination},
    models::{Confirmation, CreateExamRequest, ExamWithPatient, Page},
    services::exams::EXAM_DELETED,
    state::AppState,
    Result,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// `GET /exams`
pub async fn list_exams(
    State(state): State<AppState>,
    Pagination(page): Pagination,
) -> Result<Json<Page<ExamWithPatient>>> {
    Ok(Json(state.exams.list(page).await?))
}

/// `GET /exams/{id}`
pub async fn get_exam(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExamWithPatient>> {
    Ok(Json(state.exams.get(&id).await?))
}

/// `POST /exams`
pub async fn create_exam(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateExamRequest>,
) -> Result<(StatusCode, Json<ExamWithPatient>)> {
    let exam = state.exams.create(request).await?;
    Ok((StatusCode::CREATED, Json(exam)))
}

/// `DELETE /exams/{id}`
pub async fn delete_exam(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Confirmation>> {
    state.exams.delete(&id).await?;
    Ok(Json(Confirmation::new(EXAM_DELETED)))
}
