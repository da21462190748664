//! Account roles offered by the registration wizard

use crate::error::UnknownRole;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The account category chosen on the first wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Patient,
    Doctor,
    OrganizationAdmin,
    SystemAdmin,
}

impl Role {
    /// Every selectable role, in the order the role step lists them
    pub const ALL: [Role; 4] = [
        Role::Patient,
        Role::Doctor,
        Role::OrganizationAdmin,
        Role::SystemAdmin,
    ];

    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
            Self::OrganizationAdmin => "organization-admin",
            Self::SystemAdmin => "system-admin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Doctor => "Doctor",
            Self::OrganizationAdmin => "Organization administrator",
            Self::SystemAdmin => "System administrator",
        }
    }

    /// Whether this role registers through the organization endpoint
    pub fn registers_organization(&self) -> bool {
        matches!(self, Self::OrganizationAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "patient" => Ok(Self::Patient),
            "doctor" => Ok(Self::Doctor),
            "organization-admin" | "organization_admin" | "org-admin" => {
                Ok(Self::OrganizationAdmin)
            }
            "system-admin" | "system_admin" | "admin" => Ok(Self::SystemAdmin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
