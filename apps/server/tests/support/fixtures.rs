use anyhow::Context as _;
use axum::{body::Bytes, http::Method};
use serde_json::{json, Value};

use super::TestApp;

/// Converts a JSON value to request body bytes
pub fn to_json_body(value: &Value) -> anyhow::Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(value)?))
}

pub fn patient_body(name: &str, document: &str, birth_date: &str) -> Value {
    json!({
        "name": name,
        "document": document,
        "birthDate": birth_date,
    })
}

pub fn exam_body(patient_id: &str, modality: &str, procedure: &str, performed_at: &str) -> Value {
    json!({
        "patientId": patient_id,
        "modality": modality,
        "procedure": procedure,
        "performedAt": performed_at,
    })
}

/// Create a patient and return its id
pub async fn create_patient(app: &TestApp, document: &str) -> anyhow::Result<String> {
    let (status, body) = app
        .json(
            Method::POST,
            "/patients",
            Some(&patient_body("Test Patient", document, "1980-06-15")),
        )
        .await?;
    anyhow::ensure!(status.is_success(), "create patient failed: {status} {body}");
    body["id"]
        .as_str()
        .map(String::from)
        .context("created patient has an id")
}

/// Create an exam for `patient_id` and return its id
pub async fn create_exam(
    app: &TestApp,
    patient_id: &str,
    modality: &str,
    performed_at: &str,
) -> anyhow::Result<String> {
    let (status, body) = app
        .json(
            Method::POST,
            "/exams",
            Some(&exam_body(patient_id, modality, "Routine", performed_at)),
        )
        .await?;
    anyhow::ensure!(status.is_success(), "create exam failed: {status} {body}");
    body["id"]
        .as_str()
        .map(String::from)
        .context("created exam has an id")
}
