//! Patient rules: required fields, unique document, delete guard

use super::{parse_id, present};
use crate::{
    db::{RecordStore, StoreError},
    models::{
        dates::parse_date, CreatePatientRequest, FieldUpdate, NewPatient, Page, PageRequest,
        Patient, PatientUpdate, UpdatePatientRequest,
    },
    Error, Result,
};
use std::sync::Arc;

pub const NAME_REQUIRED: &str = "Patient name is required";
pub const DOCUMENT_REQUIRED: &str = "Patient document is required";
pub const BIRTH_DATE_REQUIRED: &str = "Patient birth date is required";
pub const BIRTH_DATE_INVALID: &str = "Invalid birth date";
pub const DOCUMENT_TAKEN: &str = "Document already registered";
pub const PATIENT_NOT_FOUND: &str = "Patient not found";
pub const PATIENT_HAS_EXAMS: &str = "Cannot delete a patient with registered exams";
pub const PATIENT_UPDATED: &str = "Patient updated successfully";
pub const PATIENT_DELETED: &str = "Patient deleted successfully";

#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn RecordStore>,
}

impl PatientService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// One page of patients, newest first, with the total count
    pub async fn list(&self, request: PageRequest) -> Result<Page<Patient>> {
        let patients = self
            .store
            .list_patients(request.offset(), request.limit())
            .await?;
        let total = self.store.count_patients().await?;
        Ok(Page::new(patients, total, request))
    }

    pub async fn get(&self, id: &str) -> Result<Patient> {
        let Some(id) = parse_id(id) else {
            return Err(not_found());
        };
        self.store.find_patient(id).await?.ok_or_else(not_found)
    }

    pub async fn create(&self, request: CreatePatientRequest) -> Result<Patient> {
        let new_patient = validate_new_patient(request)?;

        let patient = self
            .store
            .insert_patient(new_patient)
            .await
            .map_err(write_error)?;

        tracing::debug!(patient_id = %patient.id, "Patient created");
        Ok(patient)
    }

    /// Partial update; only supplied fields change
    pub async fn update(&self, id: &str, request: UpdatePatientRequest) -> Result<Patient> {
        // Reject bad input before the id lookup, as for creation.
        let update = validate_patient_update(request)?;
        let Some(id) = parse_id(id) else {
            return Err(not_found());
        };

        let patient = self
            .store
            .update_patient(id, update)
            .await
            .map_err(write_error)?;

        tracing::debug!(patient_id = %patient.id, "Patient updated");
        Ok(patient)
    }

    /// Delete a patient that has no exams
    pub async fn delete(&self, id: &str) -> Result<()> {
        let Some(id) = parse_id(id) else {
            return Err(not_found());
        };

        if self.store.count_exams_for_patient(id).await? > 0 {
            return Err(Error::Conflict(PATIENT_HAS_EXAMS.to_string()));
        }

        // An exam inserted after the guard surfaces as a foreign key error.
        self.store.delete_patient(id).await.map_err(write_error)?;

        tracing::debug!(patient_id = %id, "Patient deleted");
        Ok(())
    }
}

fn not_found() -> Error {
    Error::NotFound(PATIENT_NOT_FOUND.to_string())
}

fn write_error(err: StoreError) -> Error {
    match err {
        StoreError::NotFound => not_found(),
        StoreError::UniqueViolation { field } if field == "document" => {
            Error::Conflict(DOCUMENT_TAKEN.to_string())
        }
        StoreError::UniqueViolation { field } => {
            Error::Conflict(format!("Patient {field} already registered"))
        }
        StoreError::ForeignKeyViolation { .. } => Error::Conflict(PATIENT_HAS_EXAMS.to_string()),
        other => Error::Store(other),
    }
}

/// Checks run in a fixed order; the first failure is reported.
fn validate_new_patient(request: CreatePatientRequest) -> Result<NewPatient> {
    let name = present(request.name).ok_or_else(|| Error::Validation(NAME_REQUIRED.into()))?;
    let document =
        present(request.document).ok_or_else(|| Error::Validation(DOCUMENT_REQUIRED.into()))?;
    let birth_date = present(request.birth_date)
        .ok_or_else(|| Error::Validation(BIRTH_DATE_REQUIRED.into()))?;
    let birth_date =
        parse_date(&birth_date).ok_or_else(|| Error::Validation(BIRTH_DATE_INVALID.into()))?;

    Ok(NewPatient {
        name,
        document,
        birth_date,
    })
}

fn validate_patient_update(request: UpdatePatientRequest) -> Result<PatientUpdate> {
    let birth_date = match present(request.birth_date) {
        None => FieldUpdate::Keep,
        Some(raw) => FieldUpdate::Set(
            parse_date(&raw).ok_or_else(|| Error::Validation(BIRTH_DATE_INVALID.into()))?,
        ),
    };

    Ok(PatientUpdate {
        name: present(request.name).map_or(FieldUpdate::Keep, FieldUpdate::Set),
        document: present(request.document).map_or(FieldUpdate::Keep, FieldUpdate::Set),
        birth_date,
    })
}
