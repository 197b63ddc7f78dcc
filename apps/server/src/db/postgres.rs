//! PostgreSQL record store (sqlx)

use super::traits::{RecordStore, StoreError, StoreResult};
use crate::models::{
    Exam, ExamWithPatient, Modality, NewExam, NewPatient, Patient, PatientUpdate,
};
use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

const PATIENT_COLUMNS: &str = "id, name, document, birth_date, created_at";

// Exam columns plus the joined patient columns, aliased so both rows fit
// in one result set. `e` is the exam relation, `p` the patient.
const EXAM_WITH_PATIENT_COLUMNS: &str = r#"
    e.id AS exam_id,
    e.patient_id,
    e.modality,
    e.procedure,
    e.performed_at,
    e.created_at AS exam_created_at,
    p.name AS patient_name,
    p.document AS patient_document,
    p.birth_date AS patient_birth_date,
    p.created_at AS patient_created_at
"#;

const SCHEMA_STATEMENTS: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS patients (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        document TEXT NOT NULL,
        birth_date DATE NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT patients_document_key UNIQUE (document)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS exams (
        id UUID PRIMARY KEY,
        patient_id UUID NOT NULL,
        modality TEXT NOT NULL,
        procedure TEXT NOT NULL,
        performed_at TIMESTAMPTZ NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT exams_patient_id_fkey FOREIGN KEY (patient_id) REFERENCES patients (id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS exams_patient_id_idx ON exams (patient_id, performed_at DESC)",
    "CREATE INDEX IF NOT EXISTS exams_created_at_idx ON exams (created_at DESC)",
];

/// Record store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the tables and indexes if they are missing.
    ///
    /// Idempotent; this bootstraps an empty database and does not evolve an
    /// existing schema.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA_STATEMENTS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::debug!("Record schema ensured");
        Ok(())
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn patient_from_row(row: &PgRow) -> StoreResult<Patient> {
    Ok(Patient {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        document: row.try_get("document")?,
        birth_date: row.try_get("birth_date")?,
        created_at: row.try_get("created_at")?,
    })
}

fn exam_with_patient_from_row(row: &PgRow) -> StoreResult<ExamWithPatient> {
    let modality_code: String = row.try_get("modality")?;
    let modality: Modality = modality_code
        .parse()
        .map_err(|e: crate::models::UnknownModality| StoreError::Other(e.to_string()))?;
    let patient_id: Uuid = row.try_get("patient_id")?;

    Ok(ExamWithPatient {
        exam: Exam {
            id: row.try_get("exam_id")?,
            patient_id,
            modality,
            procedure: row.try_get("procedure")?,
            performed_at: row.try_get("performed_at")?,
            created_at: row.try_get("exam_created_at")?,
        },
        patient: Patient {
            id: patient_id,
            name: row.try_get("patient_name")?,
            document: row.try_get("patient_document")?,
            birth_date: row.try_get("patient_birth_date")?,
            created_at: row.try_get("patient_created_at")?,
        },
    })
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_patient(&self, patient: NewPatient) -> StoreResult<Patient> {
        let query = format!(
            r#"
            INSERT INTO patients (id, name, document, birth_date)
            VALUES ($1, $2, $3, $4)
            RETURNING {PATIENT_COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(&patient.name)
            .bind(&patient.document)
            .bind(patient.birth_date)
            .fetch_one(&self.pool)
            .await?;

        patient_from_row(&row)
    }

    async fn find_patient(&self, id: Uuid) -> StoreResult<Option<Patient>> {
        let query = format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = $1");

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(patient_from_row).transpose()
    }

    async fn list_patients(&self, offset: u64, limit: u64) -> StoreResult<Vec<Patient>> {
        let query = format!(
            r#"
            SELECT {PATIENT_COLUMNS}
            FROM patients
            ORDER BY created_at DESC, id DESC
            OFFSET $1
            LIMIT $2
            "#
        );

        let rows = sqlx::query(&query)
            .bind(to_i64(offset))
            .bind(to_i64(limit))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(patient_from_row).collect()
    }

    async fn count_patients(&self) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM patients")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn update_patient(&self, id: Uuid, update: PatientUpdate) -> StoreResult<Patient> {
        // NULL parameters keep the stored column value.
        let query = format!(
            r#"
            UPDATE patients
            SET name = COALESCE($2, name),
                document = COALESCE($3, document),
                birth_date = COALESCE($4, birth_date)
            WHERE id = $1
            RETURNING {PATIENT_COLUMNS}
            "#
        );

        let PatientUpdate {
            name,
            document,
            birth_date,
        } = update;

        let row = sqlx::query(&query)
            .bind(id)
            .bind(name.into_option())
            .bind(document.into_option())
            .bind(birth_date.into_option())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;

        patient_from_row(&row)
    }

    async fn delete_patient(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn insert_exam(&self, exam: NewExam) -> StoreResult<ExamWithPatient> {
        let query = format!(
            r#"
            WITH e AS (
                INSERT INTO exams (id, patient_id, modality, procedure, performed_at)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            )
            SELECT {EXAM_WITH_PATIENT_COLUMNS}
            FROM e
            JOIN patients p ON p.id = e.patient_id
            "#
        );

        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(exam.patient_id)
            .bind(exam.modality.as_str())
            .bind(&exam.procedure)
            .bind(exam.performed_at)
            .fetch_one(&self.pool)
            .await?;

        exam_with_patient_from_row(&row)
    }

    async fn find_exam(&self, id: Uuid) -> StoreResult<Option<ExamWithPatient>> {
        let query = format!(
            r#"
            SELECT {EXAM_WITH_PATIENT_COLUMNS}
            FROM exams e
            JOIN patients p ON p.id = e.patient_id
            WHERE e.id = $1
            "#
        );

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(exam_with_patient_from_row).transpose()
    }

    async fn list_exams(&self, offset: u64, limit: u64) -> StoreResult<Vec<ExamWithPatient>> {
        let query = format!(
            r#"
            SELECT {EXAM_WITH_PATIENT_COLUMNS}
            FROM exams e
            JOIN patients p ON p.id = e.patient_id
            ORDER BY e.created_at DESC, e.id DESC
            OFFSET $1
            LIMIT $2
            "#
        );

        let rows = sqlx::query(&query)
            .bind(to_i64(offset))
            .bind(to_i64(limit))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(exam_with_patient_from_row).collect()
    }

    async fn count_exams(&self) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exams")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn list_exams_for_patient(
        &self,
        patient_id: Uuid,
    ) -> StoreResult<Vec<ExamWithPatient>> {
        let query = format!(
            r#"
            SELECT {EXAM_WITH_PATIENT_COLUMNS}
            FROM exams e
            JOIN patients p ON p.id = e.patient_id
            WHERE e.patient_id = $1
            ORDER BY e.performed_at DESC
            "#
        );

        let rows = sqlx::query(&query)
            .bind(patient_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(exam_with_patient_from_row).collect()
    }

    async fn count_exams_for_patient(&self, patient_id: Uuid) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exams WHERE patient_id = $1")
            .bind(patient_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn delete_exam(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM exams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
