//! Exam rules: ordered validation and the patient reference

use super::{parse_id, present};
use crate::{
    db::{RecordStore, StoreError},
    models::{
        dates::parse_date_time, CreateExamRequest, ExamWithPatient, Modality, NewExam, Page,
        PageRequest,
    },
    Error, Result,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub const PATIENT_ID_REQUIRED: &str = "Patient id is required";
pub const MODALITY_REQUIRED: &str = "Modality is required";
pub const EXAM_DATE_REQUIRED: &str = "Exam date is required";
pub const PROCEDURE_REQUIRED: &str = "Procedure is required";
pub const EXAM_DATE_INVALID: &str = "Invalid exam date";
pub const MODALITY_INVALID: &str = "Invalid modality";
pub const EXAM_PATIENT_NOT_FOUND: &str = "Patient not found";
pub const EXAM_NOT_FOUND: &str = "Exam not found";
pub const EXAM_DELETED: &str = "Exam deleted successfully";

#[derive(Clone)]
pub struct ExamService {
    store: Arc<dyn RecordStore>,
}

/// Exam input that passed the field checks but whose patient is unresolved
#[derive(Debug)]
struct ExamDraft {
    patient_id: String,
    modality: Modality,
    procedure: String,
    performed_at: DateTime<Utc>,
}

impl ExamService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// One page of exams, newest first, each with its patient
    pub async fn list(&self, request: PageRequest) -> Result<Page<ExamWithPatient>> {
        let exams = self
            .store
            .list_exams(request.offset(), request.limit())
            .await?;
        let total = self.store.count_exams().await?;
        Ok(Page::new(exams, total, request))
    }

    pub async fn get(&self, id: &str) -> Result<ExamWithPatient> {
        let Some(id) = parse_id(id) else {
            return Err(not_found());
        };
        self.store.find_exam(id).await?.ok_or_else(not_found)
    }

    /// Exams of one patient by performed date, newest first.
    ///
    /// Unknown and malformed patient ids yield an empty list.
    pub async fn list_for_patient(&self, patient_id: &str) -> Result<Vec<ExamWithPatient>> {
        match parse_id(patient_id) {
            Some(id) => Ok(self.store.list_exams_for_patient(id).await?),
            None => Ok(Vec::new()),
        }
    }

    pub async fn create(&self, request: CreateExamRequest) -> Result<ExamWithPatient> {
        let draft = validate_new_exam(request)?;

        let patient = match parse_id(&draft.patient_id) {
            Some(id) => self.store.find_patient(id).await?,
            None => None,
        };
        let Some(patient) = patient else {
            return Err(Error::Validation(EXAM_PATIENT_NOT_FOUND.to_string()));
        };

        let exam = self
            .store
            .insert_exam(NewExam {
                patient_id: patient.id,
                modality: draft.modality,
                procedure: draft.procedure,
                performed_at: draft.performed_at,
            })
            .await
            .map_err(|err| match err {
                // Patient deleted between the lookup and the insert
                StoreError::ForeignKeyViolation { .. } => {
                    Error::Validation(EXAM_PATIENT_NOT_FOUND.to_string())
                }
                other => Error::Store(other),
            })?;

        tracing::debug!(
            exam_id = %exam.exam.id,
            patient_id = %exam.patient.id,
            modality = %exam.exam.modality,
            "Exam created"
        );
        Ok(exam)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let Some(id) = parse_id(id) else {
            return Err(not_found());
        };

        self.store.delete_exam(id).await.map_err(|err| match err {
            StoreError::NotFound => not_found(),
            other => Error::Store(other),
        })?;

        tracing::debug!(exam_id = %id, "Exam deleted");
        Ok(())
    }
}

fn not_found() -> Error {
    Error::NotFound(EXAM_NOT_FOUND.to_string())
}

fn required(value: Option<String>, message: &str) -> Result<String> {
    present(value).ok_or_else(|| Error::Validation(message.to_string()))
}

/// Presence checks come first, then format checks; the first failure wins.
fn validate_new_exam(request: CreateExamRequest) -> Result<ExamDraft> {
    let patient_id = required(request.patient_id, PATIENT_ID_REQUIRED)?;
    let modality = required(request.modality, MODALITY_REQUIRED)?;
    let performed_at = required(request.performed_at, EXAM_DATE_REQUIRED)?;
    let procedure = required(request.procedure, PROCEDURE_REQUIRED)?;

    let performed_at = parse_date_time(&performed_at)
        .ok_or_else(|| Error::Validation(EXAM_DATE_INVALID.to_string()))?;
    let modality = modality
        .parse::<Modality>()
        .map_err(|_| Error::Validation(MODALITY_INVALID.to_string()))?;

    Ok(ExamDraft {
        patient_id,
        modality,
        procedure,
        performed_at,
    })
}
