//! Service layer - validation and record invariants
//!
//! Services validate input before touching the store, enforce the
//! patient/exam invariants, and translate [`StoreError`]s into API errors.
//!
//! [`StoreError`]: crate::db::StoreError

pub mod exams;
pub mod patients;

pub use exams::ExamService;
pub use patients::PatientService;

use uuid::Uuid;

/// A required text field: absent, null and blank all count as missing.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Path and body ids; anything that is not a UUID cannot match a record.
fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
