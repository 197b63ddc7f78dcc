//! Exam endpoint tests (/exams and /patients/{id}/exams)
//!
//! Tests cover:
//! - Creation with the patient embedded in the response
//! - Ordered validation messages and the patient reference check
//! - Lookup, per-patient listing and deletion

#[allow(unused)]
mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;
use support::{
    assert_message, assert_status, create_exam, create_patient, exam_body, ids, with_test_app,
};

#[tokio::test]
async fn create_returns_exam_with_patient() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let patient_id = create_patient(app, "123").await?;

            let (status, body) = app
                .json(
                    Method::POST,
                    "/exams",
                    Some(&exam_body(&patient_id, "CT", "Chest", "2024-01-01")),
                )
                .await?;

            assert_status(status, StatusCode::CREATED, "create exam");
            assert_eq!(body["patientId"], patient_id.as_str());
            assert_eq!(body["modality"], "CT");
            assert_eq!(body["procedure"], "Chest");
            assert_eq!(body["performedAt"], "2024-01-01T00:00:00Z");
            assert_eq!(body["patient"]["id"], patient_id.as_str());
            assert_eq!(body["patient"]["document"], "123");

            let id = body["id"].as_str().unwrap();
            let (status, fetched) = app.json(Method::GET, &format!("/exams/{id}"), None).await?;
            assert_status(status, StatusCode::OK, "read back");
            assert_eq!(fetched, body);

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn create_reports_first_failing_field() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let patient_id = create_patient(app, "123").await?;
            let p = patient_id.as_str();

            let cases = [
                (json!({}), "Patient id is required"),
                (json!({ "patientId": p }), "Modality is required"),
                (
                    json!({ "patientId": p, "modality": "CT", "procedure": "Chest" }),
                    "Exam date is required",
                ),
                (
                    json!({ "patientId": p, "modality": "CT", "performedAt": "2024-01-01" }),
                    "Procedure is required",
                ),
                (
                    exam_body(p, "NOPE", "Chest", "yesterday"),
                    "Invalid exam date",
                ),
                (exam_body(p, "ct", "Chest", "2024-01-01"), "Invalid modality"),
                (exam_body(p, "PET", "Chest", "2024-01-01"), "Invalid modality"),
            ];

            for (payload, expected) in cases {
                let (status, body) = app.json(Method::POST, "/exams", Some(&payload)).await?;
                assert_status(status, StatusCode::BAD_REQUEST, &payload.to_string());
                assert_message(&body, expected, &payload.to_string());
            }

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn unknown_patient_is_bad_request() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let unknown = uuid::Uuid::new_v4().to_string();
            for patient_id in [unknown.as_str(), "42"] {
                let (status, body) = app
                    .json(
                        Method::POST,
                        "/exams",
                        Some(&exam_body(patient_id, "US", "Abdomen", "2024-05-05")),
                    )
                    .await?;
                assert_status(status, StatusCode::BAD_REQUEST, patient_id);
                assert_message(&body, "Patient not found", patient_id);
            }

            let (_, list) = app.json(Method::GET, "/exams", None).await?;
            assert_eq!(list["total"], 0);
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn space_separated_exam_date_is_read_as_utc() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let patient_id = create_patient(app, "123").await?;

            let (status, body) = app
                .json(
                    Method::POST,
                    "/exams",
                    Some(&exam_body(&patient_id, "MR", "Knee", "2024-01-01 10:00:00")),
                )
                .await?;
            assert_status(status, StatusCode::CREATED, "space separated date");
            assert_eq!(body["performedAt"], "2024-01-01T10:00:00Z");
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn every_modality_is_accepted()-> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let patient_id = create_patient(app, "777").await?;
            for modality in [
                "CR", "CT", "DX", "MG", "MR", "NM", "OT", "CP", "ES", "EEG", "BMD", "US", "XA",
            ] {
                create_exam(app, &patient_id, modality, "2024-01-01T08:00:00Z").await?;
            }

            let (_, list) = app
                .json(Method::GET, &format!("/patients/{patient_id}/exams"), None)
                .await?;
            assert_eq!(list.as_array().map(Vec::len), Some(13));
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn patient_exams_are_newest_performed_first() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let patient_id = create_patient(app, "100").await?;
            let other_patient = create_patient(app, "200").await?;

            let old = create_exam(app, &patient_id, "CR", "2023-03-01").await?;
            let new = create_exam(app, &patient_id, "CT", "2024-07-01").await?;
            let middle = create_exam(app, &patient_id, "MR", "2024-01-15T09:30:00Z").await?;
            create_exam(app, &other_patient, "US", "2024-08-01").await?;

            let (status, list) = app
                .json(Method::GET, &format!("/patients/{patient_id}/exams"), None)
                .await?;
            assert_status(status, StatusCode::OK, "patient exams");
            assert_eq!(ids(&list), vec![new, middle, old]);
            for exam in list.as_array().unwrap() {
                assert_eq!(exam["patient"]["id"], patient_id.as_str());
            }

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn patient_exams_of_unknown_patient_is_empty() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let missing = uuid::Uuid::new_v4().to_string();
            for id in [missing.as_str(), "not-a-uuid"] {
                let (status, list) = app
                    .json(Method::GET, &format!("/patients/{id}/exams"), None)
                    .await?;
                assert_status(status, StatusCode::OK, id);
                assert_eq!(list, json!([]));
            }

            let patient_id = create_patient(app, "300").await?;
            let (_, list) = app
                .json(Method::GET, &format!("/patients/{patient_id}/exams"), None)
                .await?;
            assert_eq!(list, json!([]));
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn delete_exam_then_lookups_are_not_found() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let patient_id = create_patient(app, "400").await?;
            let exam_id = create_exam(app, &patient_id, "XA", "2024-04-04").await?;
            let path = format!("/exams/{exam_id}");

            let (status, body) = app.json(Method::DELETE, &path, None).await?;
            assert_status(status, StatusCode::OK, "delete");
            assert_message(&body, "Exam deleted successfully", "delete");

            let (status, body) = app.json(Method::DELETE, &path, None).await?;
            assert_status(status, StatusCode::NOT_FOUND, "second delete");
            assert_message(&body, "Exam not found", "second delete");

            let (status, _) = app.json(Method::GET, &path, None).await?;
            assert_status(status, StatusCode::NOT_FOUND, "get deleted");

            let (status, _) = app.json(Method::GET, "/exams/abc", None).await?;
            assert_status(status, StatusCode::NOT_FOUND, "malformed id");

            Ok(())
        })
    })
    .await
}
