//! Branch selectors: fields whose value picks one dependent field group
//!
//! A branch never changes which step a field lives on, only which fields of
//! that step are in play. Fields of a group that is not selected are neither
//! validated nor submitted.

use crate::state::FieldValues;
use serde::{Deserialize, Serialize};

/// Field holding the doctor's practice type
pub const PRACTICE_TYPE: &str = "practiceType";

/// Fields owned by the `own_clinic` practice branch
pub const CLINIC_FIELDS: &[&str] = &[
    "clinic.name",
    "clinic.street",
    "clinic.city",
    "clinic.state",
    "clinic.zipCode",
];

/// Fields owned by the `hospital` practice branch
pub const HOSPITAL_FIELDS: &[&str] = &["hospitalId"];

/// Where a doctor practices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PracticeType {
    OwnClinic,
    Hospital,
}

impl PracticeType {
    pub const ALL: [PracticeType; 2] = [PracticeType::OwnClinic, PracticeType::Hospital];
    pub const OWN_CLINIC: &'static str = "own_clinic";
    pub const HOSPITAL: &'static str = "hospital";
    /// Option list used by the `practiceType` choice field
    pub const OPTIONS: &'static [&'static str] = &[Self::OWN_CLINIC, Self::HOSPITAL];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OwnClinic => Self::OWN_CLINIC,
            Self::Hospital => Self::HOSPITAL,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OwnClinic => "Own clinic",
            Self::Hospital => "Hospital",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value.trim())
    }

    /// Read the current selection out of the collected values
    pub fn selected(values: &FieldValues) -> Option<Self> {
        values.text(PRACTICE_TYPE).and_then(|v| Self::parse(&v))
    }

    /// Fields that become required once this practice type is chosen
    pub fn dependent_fields(&self) -> &'static [&'static str] {
        match self {
            Self::OwnClinic => CLINIC_FIELDS,
            Self::Hospital => HOSPITAL_FIELDS,
        }
    }
}

/// Closed set of branch selectors a step may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    Practice,
}

impl Branch {
    /// Name of the selector field
    pub fn selector(&self) -> &'static str {
        match self {
            Self::Practice => PRACTICE_TYPE,
        }
    }

    /// Dependent fields of the currently selected arm (empty while unset)
    pub fn selected_fields(&self, values: &FieldValues) -> &'static [&'static str] {
        match self {
            Self::Practice => PracticeType::selected(values)
                .map(|p| p.dependent_fields())
                .unwrap_or(&[]),
        }
    }

    /// Every dependent field across all arms
    pub fn all_fields(&self) -> Vec<&'static str> {
        match self {
            Self::Practice => PracticeType::ALL
                .iter()
                .flat_map(|p| p.dependent_fields().iter().copied())
                .collect(),
        }
    }
}
