use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use imaging_records::{
    db::{InMemoryRecordStore, RecordStore, StoreError, StoreResult},
    models::{ExamWithPatient, NewExam, NewPatient, Patient, PatientUpdate},
};
use uuid::Uuid;

/// A store whose every call fails, as when the database is unreachable
pub struct UnavailableStore;

fn unavailable<T>() -> StoreResult<T> {
    Err(StoreError::Other(
        "connection refused (os error 111)".to_string(),
    ))
}

#[async_trait]
impl RecordStore for UnavailableStore {
    async fn ping(&self) -> StoreResult<()> {
        unavailable()
    }

    async fn insert_patient(&self, _patient: NewPatient) -> StoreResult<Patient> {
        unavailable()
    }

    async fn find_patient(&self, _id: Uuid) -> StoreResult<Option<Patient>> {
        unavailable()
    }

    async fn list_patients(&self, _offset: u64, _limit: u64) -> StoreResult<Vec<Patient>> {
        unavailable()
    }

    async fn count_patients(&self) -> StoreResult<u64> {
        unavailable()
    }

    async fn update_patient(&self, _id: Uuid, _update: PatientUpdate) -> StoreResult<Patient> {
        unavailable()
    }

    async fn delete_patient(&self, _id: Uuid) -> StoreResult<()> {
        unavailable()
    }

    async fn insert_exam(&self, _exam: NewExam) -> StoreResult<ExamWithPatient> {
        unavailable()
    }

    async fn find_exam(&self, _id: Uuid) -> StoreResult<Option<ExamWithPatient>> {
        unavailable()
    }

    async fn list_exams(&self, _offset: u64, _limit: u64) -> StoreResult<Vec<ExamWithPatient>> {
        unavailable()
    }

    async fn count_exams(&self) -> StoreResult<u64> {
        unavailable()
    }

    async fn list_exams_for_patient(
        &self,
        _patient_id: Uuid,
    ) -> StoreResult<Vec<ExamWithPatient>> {
        unavailable()
    }

    async fn count_exams_for_patient(&self, _patient_id: Uuid) -> StoreResult<u64> {
        unavailable()
    }

    async fn delete_exam(&self, _id: Uuid) -> StoreResult<()> {
        unavailable()
    }
}

/// The in-memory store seen through out-of-date reads.
///
/// Exam counts are always zero and every patient id resolves, as if another
/// request committed between a service's check and its write. Writes still
/// hit the real constraints.
#[derive(Default)]
pub struct StaleReadStore {
    inner: InMemoryRecordStore,
}

#[async_trait]
impl RecordStore for StaleReadStore {
    async fn ping(&self) -> StoreResult<()> {
        self.inner.ping().await
    }

    async fn insert_patient(&self, patient: NewPatient) -> StoreResult<Patient> {
        self.inner.insert_patient(patient).await
    }

    async fn find_patient(&self, id: Uuid) -> StoreResult<Option<Patient>> {
        match self.inner.find_patient(id).await? {
            Some(patient) => Ok(Some(patient)),
            None => Ok(Some(Patient {
                id,
                name: "Removed".to_string(),
                document: id.to_string(),
                birth_date: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
                created_at: Utc::now(),
            })),
        }
    }

    async fn list_patients(&self, offset: u64, limit: u64) -> StoreResult<Vec<Patient>> {
        self.inner.list_patients(offset, limit).await
    }

    async fn count_patients(&self) -> StoreResult<u64> {
        self.inner.count_patients().await
    }

    async fn update_patient(&self, id: Uuid, update: PatientUpdate) -> StoreResult<Patient> {
        self.inner.update_patient(id, update).await
    }

    async fn delete_patient(&self, id: Uuid) -> StoreResult<()> {
        self.inner.delete_patient(id).await
    }

    async fn insert_exam(&self, exam: NewExam) -> StoreResult<ExamWithPatient> {
        self.inner.insert_exam(exam).await
    }

    async fn find_exam(&self, id: Uuid) -> StoreResult<Option<ExamWithPatient>> {
        self.inner.find_exam(id).await
    }

    async fn list_exams(&self, offset: u64, limit: u64) -> StoreResult<Vec<ExamWithPatient>> {
        self.inner.list_exams(offset, limit).await
    }

    async fn count_exams(&self) -> StoreResult<u64> {
        self.inner.count_exams().await
    }

    async fn list_exams_for_patient(
        &self,
        patient_id: Uuid,
    ) -> StoreResult<Vec<ExamWithPatient>> {
        self.inner.list_exams_for_patient(patient_id).await
    }

    async fn count_exams_for_patient(&self, _patient_id: Uuid) -> StoreResult<u64> {
        Ok(0)
    }

    async fn delete_exam(&self, id: Uuid) -> StoreResult<()> {
        self.inner.delete_exam(id).await
    }
}
