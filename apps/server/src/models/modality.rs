//! Imaging modality codes accepted for exams.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Closed set of DICOM-style modality codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    /// Computed radiography
    Cr,
    /// Computed tomography
    Ct,
    /// Digital radiography
    Dx,
    /// Mammography
    Mg,
    /// Magnetic resonance
    Mr,
    /// Nuclear medicine
    Nm,
    /// Other
    Ot,
    /// Colposcopy
    Cp,
    /// Endoscopy
    Es,
    /// Electroencephalography
    Eeg,
    /// Bone mineral densitometry
    Bmd,
    /// Ultrasound
    Us,
    /// X-ray angiography
    Xa,
}

impl Modality {
    pub const ALL: [Modality; 13] = [
        Modality::Cr,
        Modality::Ct,
        Modality::Dx,
        Modality::Mg,
        Modality::Mr,
        Modality::Nm,
        Modality::Ot,
        Modality::Cp,
        Modality::Es,
        Modality::Eeg,
        Modality::Bmd,
        Modality::Us,
        Modality::Xa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Cr => "CR",
            Modality::Ct => "CT",
            Modality::Dx => "DX",
            Modality::Mg => "MG",
            Modality::Mr => "MR",
            Modality::Nm => "NM",
            Modality::Ot => "OT",
            Modality::Cp => "CP",
            Modality::Es => "ES",
            Modality::Eeg => "EEG",
            Modality::Bmd => "BMD",
            Modality::Us => "US",
            Modality::Xa => "XA",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown modality code: {0}")]
pub struct UnknownModality(pub String);

impl FromStr for Modality {
    type Err = UnknownModality;

    /// Codes are matched exactly; `ct` is not `CT`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Modality::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownModality(s.to_string()))
    }
}
