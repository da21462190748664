//! Step planning: which pages a role walks through and which fields each owns

use crate::branch::Branch;
use crate::profile;
use crate::state::{FieldValues, Role};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Identity of a wizard page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Role,
    Account,
    Personal,
    Medical,
    Professional,
    Practice,
    Organization,
    Facilities,
    Access,
}

impl StepId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Role => "role",
            Self::Account => "account",
            Self::Personal => "personal",
            Self::Medical => "medical",
            Self::Professional => "professional",
            Self::Practice => "practice",
            Self::Organization => "organization",
            Self::Facilities => "facilities",
            Self::Access => "access",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A page of the wizard and the fields it governs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDefinition {
    pub id: StepId,
    pub label: &'static str,
    /// Fields shown regardless of any branch
    pub fields: &'static [&'static str],
    /// Selector whose chosen arm adds fields to this step
    pub branch: Option<Branch>,
}

impl StepDefinition {
    /// Fields in display order for the current values
    pub fn fields_for(&self, values: &FieldValues) -> Vec<&'static str> {
        let mut fields = self.fields.to_vec();
        if let Some(branch) = self.branch {
            fields.push(branch.selector());
            fields.extend_from_slice(branch.selected_fields(values));
        }
        fields
    }

    /// Every field this step can ever own, across all branch arms
    pub fn all_fields(&self) -> Vec<&'static str> {
        let mut fields = self.fields.to_vec();
        if let Some(branch) = self.branch {
            fields.push(branch.selector());
            fields.extend(branch.all_fields());
        }
        fields
    }
}

pub const ROLE_STEP: StepDefinition = StepDefinition {
    id: StepId::Role,
    label: "Choose your role",
    fields: &[],
    branch: None,
};

pub const ACCOUNT_STEP: StepDefinition = StepDefinition {
    id: StepId::Account,
    label: "Account",
    fields: &["firstName", "lastName", "email", "password", "confirmPassword"],
    branch: None,
};

pub const PERSONAL_STEP: StepDefinition = StepDefinition {
    id: StepId::Personal,
    label: "Personal details",
    fields: &["phone", "dateOfBirth", "gender", "address"],
    branch: None,
};

pub const MEDICAL_STEP: StepDefinition = StepDefinition {
    id: StepId::Medical,
    label: "Medical information",
    fields: &["emergencyContact", "emergencyPhone", "bloodType", "allergies"],
    branch: None,
};

pub const PROFESSIONAL_STEP: StepDefinition = StepDefinition {
    id: StepId::Professional,
    label: "Professional information",
    fields: &[
        "licenseNumber",
        "specialization",
        "yearsOfExperience",
        "qualifications",
    ],
    branch: None,
};

pub const PRACTICE_STEP: StepDefinition = StepDefinition {
    id: StepId::Practice,
    label: "Practice",
    fields: &[],
    branch: Some(Branch::Practice),
};

pub const ORGANIZATION_STEP: StepDefinition = StepDefinition {
    id: StepId::Organization,
    label: "Organization",
    fields: &[
        "organizationName",
        "organizationType",
        "registrationNumber",
        "contactEmail",
        "adminPhone",
        "address.street",
        "address.city",
        "address.state",
        "address.zipCode",
    ],
    branch: None,
};

pub const FACILITIES_STEP: StepDefinition = StepDefinition {
    id: StepId::Facilities,
    label: "Facilities",
    fields: &[
        "totalBeds",
        "icuBeds",
        "emergencyBeds",
        "specialties",
        "acceptsInsurance",
    ],
    branch: None,
};

pub const ACCESS_STEP: StepDefinition = StepDefinition {
    id: StepId::Access,
    label: "Administrator access",
    fields: &["department", "accessCode"],
    branch: None,
};

/// Ordered steps for a role; step 0 is always role selection
pub fn planned_steps(role: Option<Role>) -> Vec<StepId> {
    profile::lookup(role).steps.iter().map(|s| s.id).collect()
}

/// Definition of `step` within the role's plan
pub fn step_definition(step: StepId, role: Option<Role>) -> Option<&'static StepDefinition> {
    profile::lookup(role).steps.iter().find(|s| s.id == step)
}

/// Fields owned by `step` in display order, re-evaluated against `values`
///
/// A step that is not part of the role's plan owns nothing.
pub fn ordered_fields_for_step(
    step: StepId,
    role: Option<Role>,
    values: &FieldValues,
) -> Vec<&'static str> {
    step_definition(step, role)
        .map(|def| def.fields_for(values))
        .unwrap_or_default()
}

/// Fields owned by `step` for the current values
pub fn fields_for_step(step: StepId, role: Option<Role>, values: &FieldValues) -> BTreeSet<String> {
    ordered_fields_for_step(step, role, values)
        .into_iter()
        .map(String::from)
        .collect()
}

/// Every field `step` could own for `role`, whatever the branch selection
pub fn step_field_universe(step: StepId, role: Option<Role>) -> BTreeSet<String> {
    step_definition(step, role)
        .map(|def| def.all_fields().into_iter().map(String::from).collect())
        .unwrap_or_default()
}
