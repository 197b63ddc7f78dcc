//! Storage capability used by the record services

use crate::models::{ExamWithPatient, NewExam, NewPatient, Patient, PatientUpdate};
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Outcome of a failed storage call.
///
/// Backends translate their native error codes into these variants so the
/// service layer never inspects driver errors or message text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The row addressed by a write does not exist
    #[error("record not found")]
    NotFound,

    /// A unique constraint rejected the write
    #[error("unique constraint violated on {field}")]
    UniqueViolation { field: String },

    /// A foreign key rejected the write (missing parent or existing children)
    #[error("foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    /// Anything else; the detail is for logs only
    #[error("{0}")]
    Other(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().unwrap_or_default().to_string();
                match db_err.kind() {
                    sqlx::error::ErrorKind::UniqueViolation => StoreError::UniqueViolation {
                        field: unique_field_from_constraint(&constraint),
                    },
                    sqlx::error::ErrorKind::ForeignKeyViolation => {
                        StoreError::ForeignKeyViolation { constraint }
                    }
                    _ => StoreError::Other(err.to_string()),
                }
            }
            _ => StoreError::Other(err.to_string()),
        }
    }
}

/// Postgres names unique constraints `<table>_<column>_key`.
fn unique_field_from_constraint(constraint: &str) -> String {
    constraint
        .strip_suffix("_key")
        .and_then(|rest| rest.split_once('_').map(|(_, column)| column))
        .unwrap_or(constraint)
        .to_string()
}

/// Storage capability for patients and exams.
///
/// Implemented by the PostgreSQL store and by an in-memory store. The trait
/// is object safe; the application holds it as `Arc<dyn RecordStore>`.
///
/// Every exam read returns the exam joined with its patient.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Cheap liveness probe for health checks
    async fn ping(&self) -> StoreResult<()>;

    /// Insert a patient with a fresh id and creation timestamp
    ///
    /// # Errors
    /// * `UniqueViolation { field: "document" }` - document already taken
    async fn insert_patient(&self, patient: NewPatient) -> StoreResult<Patient>;

    /// Read a patient by id
    async fn find_patient(&self, id: Uuid) -> StoreResult<Option<Patient>>;

    /// Patients ordered by creation time, newest first
    async fn list_patients(&self, offset: u64, limit: u64) -> StoreResult<Vec<Patient>>;

    async fn count_patients(&self) -> StoreResult<u64>;

    /// Apply a partial update; `Keep` fields are left untouched
    ///
    /// # Errors
    /// * `NotFound` - no patient with this id
    /// * `UniqueViolation { field: "document" }` - document used by another patient
    async fn update_patient(&self, id: Uuid, update: PatientUpdate) -> StoreResult<Patient>;

    /// # Errors
    /// * `NotFound` - no patient with this id
    /// * `ForeignKeyViolation` - exams still reference the patient
    async fn delete_patient(&self, id: Uuid) -> StoreResult<()>;

    /// Insert an exam with a fresh id and creation timestamp
    ///
    /// # Errors
    /// * `ForeignKeyViolation` - the referenced patient does not exist
    async fn insert_exam(&self, exam: NewExam) -> StoreResult<ExamWithPatient>;

    async fn find_exam(&self, id: Uuid) -> StoreResult<Option<ExamWithPatient>>;

    /// Exams ordered by creation time, newest first
    async fn list_exams(&self, offset: u64, limit: u64) -> StoreResult<Vec<ExamWithPatient>>;

    async fn count_exams(&self) -> StoreResult<u64>;

    /// All exams of one patient ordered by `performed_at`, most recent first
    async fn list_exams_for_patient(&self, patient_id: Uuid)
        -> StoreResult<Vec<ExamWithPatient>>;

    async fn count_exams_for_patient(&self, patient_id: Uuid) -> StoreResult<u64>;

    /// # Errors
    /// * `NotFound` - no exam with this id
    async fn delete_exam(&self, id: Uuid) -> StoreResult<()>;
}
