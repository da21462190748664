//! Role profiles: the single table describing how each role registers
//!
//! Adding a role means adding a profile here (schema fragments, step list,
//! payload assembler); the wizard itself has no per-role branching.

use crate::error::AssemblyError;
use crate::payload::{self, RegistrationPayload};
use crate::schema::catalog;
use crate::schema::Fragment;
use crate::state::{FieldValues, Role};
use crate::steps::{self, StepDefinition};

/// Builds the request body for a role from completed values
pub type Assembler = fn(&FieldValues) -> Result<RegistrationPayload, AssemblyError>;

/// Everything that varies between roles
#[derive(Clone, Copy)]
pub struct RoleProfile {
    pub role: Option<Role>,
    pub fragments: &'static [Fragment],
    pub steps: &'static [StepDefinition],
    pub assembler: Assembler,
}

/// Profile used before a role has been chosen
static BASE: RoleProfile = RoleProfile {
    role: None,
    fragments: &[catalog::BASE],
    steps: &[steps::ROLE_STEP, steps::ACCOUNT_STEP],
    assembler: payload::assemble_without_role,
};

static PATIENT: RoleProfile = RoleProfile {
    role: Some(Role::Patient),
    fragments: &[catalog::BASE, catalog::PERSONAL, catalog::PATIENT],
    steps: &[
        steps::ROLE_STEP,
        steps::ACCOUNT_STEP,
        steps::PERSONAL_STEP,
        steps::MEDICAL_STEP,
    ],
    assembler: payload::assemble_patient,
};

static DOCTOR: RoleProfile = RoleProfile {
    role: Some(Role::Doctor),
    fragments: &[catalog::BASE, catalog::PERSONAL, catalog::DOCTOR],
    steps: &[
        steps::ROLE_STEP,
        steps::ACCOUNT_STEP,
        steps::PERSONAL_STEP,
        steps::PROFESSIONAL_STEP,
        steps::PRACTICE_STEP,
    ],
    assembler: payload::assemble_doctor,
};

static ORGANIZATION_ADMIN: RoleProfile = RoleProfile {
    role: Some(Role::OrganizationAdmin),
    fragments: &[catalog::BASE, catalog::ORGANIZATION],
    steps: &[
        steps::ROLE_STEP,
        steps::ACCOUNT_STEP,
        steps::ORGANIZATION_STEP,
        steps::FACILITIES_STEP,
    ],
    assembler: payload::assemble_organization,
};

static SYSTEM_ADMIN: RoleProfile = RoleProfile {
    role: Some(Role::SystemAdmin),
    fragments: &[catalog::BASE, catalog::PERSONAL, catalog::SYSTEM_ADMIN],
    steps: &[
        steps::ROLE_STEP,
        steps::ACCOUNT_STEP,
        steps::PERSONAL_STEP,
        steps::ACCESS_STEP,
    ],
    assembler: payload::assemble_system_admin,
};

/// Look up the profile for a role (`None` → base profile)
pub fn lookup(role: Option<Role>) -> &'static RoleProfile {
    match role {
        None => &BASE,
        Some(Role::Patient) => &PATIENT,
        Some(Role::Doctor) => &DOCTOR,
        Some(Role::OrganizationAdmin) => &ORGANIZATION_ADMIN,
        Some(Role::SystemAdmin) => &SYSTEM_ADMIN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_returns_matching_profile() {
        assert_eq!(lookup(None).role, None);
        for role in Role::ALL {
            assert_eq!(lookup(Some(role)).role, Some(role));
        }
    }

    #[test]
    fn test_every_profile_starts_with_base_fragment() {
        for role in Role::ALL {
            assert_eq!(lookup(Some(role)).fragments[0].name, "base");
        }
    }

    #[test]
    fn test_base_profile_cannot_assemble() {
        let result = (lookup(None).assembler)(&FieldValues::new());
        assert_eq!(result, Err(AssemblyError::MissingField("role")));
    }
}
