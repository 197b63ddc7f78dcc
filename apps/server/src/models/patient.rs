//! Patient records and their write payloads

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    /// National identity document; unique across patients
    pub document: String,
    pub birth_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Validated input for a new patient row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPatient {
    pub name: String,
    pub document: String,
    pub birth_date: NaiveDate,
}

/// A single field of a partial update
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldUpdate<T> {
    /// Leave the stored value untouched
    #[default]
    Keep,
    /// Replace the stored value
    Set(T),
}

impl<T> FieldUpdate<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, FieldUpdate::Keep)
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            FieldUpdate::Keep => None,
            FieldUpdate::Set(value) => Some(value),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            FieldUpdate::Keep => None,
            FieldUpdate::Set(value) => Some(value),
        }
    }

    /// Resolve against the current stored value.
    pub fn apply(self, current: T) -> T {
        match self {
            FieldUpdate::Keep => current,
            FieldUpdate::Set(value) => value,
        }
    }
}

/// Validated partial update for a patient
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatientUpdate {
    pub name: FieldUpdate<String>,
    pub document: FieldUpdate<String>,
    pub birth_date: FieldUpdate<NaiveDate>,
}

impl PatientUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_keep() && self.document.is_keep() && self.birth_date.is_keep()
    }
}

/// Body of `POST /patients`
///
/// Fields stay optional so that missing values can be reported one by one
/// instead of failing JSON deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePatientRequest {
    pub name: Option<String>,
    pub document: Option<String>,
    pub birth_date: Option<String>,
}

/// Body of `PUT /patients/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub document: Option<String>,
    pub birth_date: Option<String>,
}

/// Response of a successful patient update
#[derive(Debug, Clone, Serialize)]
pub struct PatientUpdated {
    pub message: String,
    pub patient: Patient,
}
