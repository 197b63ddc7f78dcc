//! In-memory record store
//!
//! Enforces the same constraints as the PostgreSQL schema (unique document,
//! exam → patient foreign key) so it can stand in for the database in tests
//! and local runs.

use super::traits::{RecordStore, StoreError, StoreResult};
use crate::models::{Exam, ExamWithPatient, NewExam, NewPatient, Patient, PatientUpdate};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

const DOCUMENT_FIELD: &str = "document";
const EXAM_PATIENT_FK: &str = "exams_patient_id_fkey";

#[derive(Default)]
struct Tables {
    // Both vectors are kept in insertion (creation) order.
    patients: Vec<Patient>,
    exams: Vec<Exam>,
}

impl Tables {
    fn patient(&self, id: Uuid) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    fn enrich(&self, exam: &Exam) -> StoreResult<ExamWithPatient> {
        let patient = self.patient(exam.patient_id).cloned().ok_or_else(|| {
            StoreError::Other(format!(
                "exam {} references missing patient {}",
                exam.id, exam.patient_id
            ))
        })?;
        Ok(ExamWithPatient {
            exam: exam.clone(),
            patient,
        })
    }
}

#[derive(Default)]
pub struct InMemoryRecordStore {
    tables: RwLock<Tables>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn window(offset: u64, limit: u64) -> (usize, usize) {
    (
        usize::try_from(offset).unwrap_or(usize::MAX),
        usize::try_from(limit).unwrap_or(usize::MAX),
    )
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert_patient(&self, patient: NewPatient) -> StoreResult<Patient> {
        let mut tables = self.tables.write().await;

        if tables.patients.iter().any(|p| p.document == patient.document) {
            return Err(StoreError::UniqueViolation {
                field: DOCUMENT_FIELD.to_string(),
            });
        }

        let stored = Patient {
            id: Uuid::new_v4(),
            name: patient.name,
            document: patient.document,
            birth_date: patient.birth_date,
            created_at: Utc::now(),
        };
        tables.patients.push(stored.clone());
        Ok(stored)
    }

    async fn find_patient(&self, id: Uuid) -> StoreResult<Option<Patient>> {
        Ok(self.tables.read().await.patient(id).cloned())
    }

    async fn list_patients(&self, offset: u64, limit: u64) -> StoreResult<Vec<Patient>> {
        let (skip, take) = window(offset, limit);
        let tables = self.tables.read().await;
        Ok(tables
            .patients
            .iter()
            .rev()
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn count_patients(&self) -> StoreResult<u64> {
        Ok(self.tables.read().await.patients.len() as u64)
    }

    async fn update_patient(&self, id: Uuid, update: PatientUpdate) -> StoreResult<Patient> {
        let mut tables = self.tables.write().await;

        if tables.patient(id).is_none() {
            return Err(StoreError::NotFound);
        }

        if let Some(document) = update.document.as_set() {
            if tables
                .patients
                .iter()
                .any(|p| p.id != id && &p.document == document)
            {
                return Err(StoreError::UniqueViolation {
                    field: DOCUMENT_FIELD.to_string(),
                });
            }
        }

        let patient = tables
            .patients
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound)?;

        let PatientUpdate {
            name,
            document,
            birth_date,
        } = update;
        patient.name = name.apply(std::mem::take(&mut patient.name));
        patient.document = document.apply(std::mem::take(&mut patient.document));
        patient.birth_date = birth_date.apply(patient.birth_date);

        Ok(patient.clone())
    }

    async fn delete_patient(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        let position = tables
            .patients
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::NotFound)?;

        if tables.exams.iter().any(|e| e.patient_id == id) {
            return Err(StoreError::ForeignKeyViolation {
                constraint: EXAM_PATIENT_FK.to_string(),
            });
        }

        tables.patients.remove(position);
        Ok(())
    }

    async fn insert_exam(&self, exam: NewExam) -> StoreResult<ExamWithPatient> {
        let mut tables = self.tables.write().await;

        if tables.patient(exam.patient_id).is_none() {
            return Err(StoreError::ForeignKeyViolation {
                constraint: EXAM_PATIENT_FK.to_string(),
            });
        }

        let stored = Exam {
            id: Uuid::new_v4(),
            patient_id: exam.patient_id,
            modality: exam.modality,
            procedure: exam.procedure,
            performed_at: exam.performed_at,
            created_at: Utc::now(),
        };
        tables.exams.push(stored.clone());
        tables.enrich(&stored)
    }

    async fn find_exam(&self, id: Uuid) -> StoreResult<Option<ExamWithPatient>> {
        let tables = self.tables.read().await;
        tables
            .exams
            .iter()
            .find(|e| e.id == id)
            .map(|exam| tables.enrich(exam))
            .transpose()
    }

    async fn list_exams(&self, offset: u64, limit: u64) -> StoreResult<Vec<ExamWithPatient>> {
        let (skip, take) = window(offset, limit);
        let tables = self.tables.read().await;
        tables
            .exams
            .iter()
            .rev()
            .skip(skip)
            .take(take)
            .map(|exam| tables.enrich(exam))
            .collect()
    }

    async fn count_exams(&self) -> StoreResult<u64> {
        Ok(self.tables.read().await.exams.len() as u64)
    }

    async fn list_exams_for_patient(
        &self,
        patient_id: Uuid,
    ) -> StoreResult<Vec<ExamWithPatient>> {
        let tables = self.tables.read().await;
        let mut exams: Vec<&Exam> = tables
            .exams
            .iter()
            .filter(|e| e.patient_id == patient_id)
            .collect();
        exams.sort_by(|a, b| b.performed_at.cmp(&a.performed_at));
        exams.into_iter().map(|exam| tables.enrich(exam)).collect()
    }

    async fn count_exams_for_patient(&self, patient_id: Uuid) -> StoreResult<u64> {
        let tables = self.tables.read().await;
        Ok(tables
            .exams
            .iter()
            .filter(|e| e.patient_id == patient_id)
            .count() as u64)
    }

    async fn delete_exam(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let position = tables
            .exams
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::NotFound)?;
        tables.exams.remove(position);
        Ok(())
    }
}
