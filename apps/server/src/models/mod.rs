//! Domain models for patient and exam records

pub mod dates;
pub mod exam;
pub mod modality;
pub mod pagination;
pub mod patient;

pub use exam::{CreateExamRequest, Exam, ExamWithPatient, NewExam};
pub use modality::{Modality, UnknownModality};
pub use pagination::{Page, PageQuery, PageRequest};
pub use patient::{
    CreatePatientRequest, FieldUpdate, NewPatient, Patient, PatientUpdate, PatientUpdated,
    UpdatePatientRequest,
};

use serde::Serialize;

/// `{ "message": ... }` confirmation body
#[derive(Debug, Clone, Serialize)]
pub struct Confirmation {
    pub message: String,
}

impl Confirmation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
