//! Exam records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Modality, Patient};

/// A stored exam
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub modality: Modality,
    pub procedure: String,
    pub performed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// An exam joined with the patient it belongs to.
///
/// This is the shape every exam endpoint returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamWithPatient {
    #[serde(flatten)]
    pub exam: Exam,
    pub patient: Patient,
}

/// Validated input for a new exam row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExam {
    pub patient_id: Uuid,
    pub modality: Modality,
    pub procedure: String,
    pub performed_at: DateTime<Utc>,
}

/// Body of `POST /exams`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateExamRequest {
    pub patient_id: Option<String>,
    pub modality: Option<String>,
    pub procedure: Option<String>,
    pub performed_at: Option<String>,
}
