//! Patient handlers

use crate::{
    api::extractors::{JsonBody, Pagination},
    models::{
        Confirmation, CreatePatientRequest, ExamWithPatient, Page, Patient, PatientUpdated,
        UpdatePatientRequest,
    },
    services::patients::{PATIENT_DELETED, PATIENT_UPDATED},
    state::AppState,
    Result,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// `GET /patients`
pub async fn list_patients(
    State(state): State<AppState>,
    Pagination(page): Pagination,
) -> Result<Json<Page<Patient>>> {
    Ok(Json(state.patients.list(page).await?))
}

/// `GET /patients/{id}`
pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Patient>> {
    Ok(Json(state.patients.get(&id).await?))
}

/// `POST /patients`
pub async fn create_patient(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Patient>)> {
    let patient = state.patients.create(request).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

/// `PUT /patients/{id}`
pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdatePatientRequest>,
) -> Result<Json<PatientUpdated>> {
    let patient = state.patients.update(&id, request).await?;
    Ok(Json(PatientUpdated {
        message: PATIENT_UPDATED.to_string(),
        patient,
    }))
}

/// `DELETE /patients/{id}`
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Confirmation>> {
    state.patients.delete(&id).await?;
    Ok(Json(Confirmation::new(PATIENT_DELETED)))
}

/// `GET /patients/{id}/exams`
pub async fn list_patient_exams(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ExamWithPatient>>> {
    Ok(Json(state.exams.list_for_patient(&id).await?))
}
