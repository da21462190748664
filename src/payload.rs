//! Payload assembly: completed values → request body for one endpoint
//!
//! Individual accounts (patient, doctor, system administrator) go to the
//! `register` endpoint; organization administrators go to
//! `registerOrganization`. Payloads are built in one go at submission time.

use crate::branch::PracticeType;
use crate::error::AssemblyError;
use crate::profile;
use crate::state::{FieldValue, FieldValues, Role};
use serde::Serialize;

/// Body for one of the registration endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RegistrationPayload {
    Individual(IndividualPayload),
    Organization(OrganizationPayload),
}

/// Body for the individual-account endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(flatten)]
    pub details: RoleDetails,
}

/// Role-specific part of an individual payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RoleDetails {
    Patient(PatientDetails),
    Doctor(DoctorDetails),
    SystemAdmin(SystemAdminDetails),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDetails {
    pub emergency_contact: String,
    pub emergency_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    pub allergies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDetails {
    pub license_number: String,
    pub specialization: String,
    pub years_of_experience: u32,
    pub qualifications: Vec<String>,
    #[serde(flatten)]
    pub practice: Practice,
}

/// The selected practice branch; only its own fields are carried
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "practiceType", rename_all = "snake_case")]
pub enum Practice {
    OwnClinic {
        clinic: ClinicDetails,
    },
    Hospital {
        #[serde(rename = "hospitalId")]
        hospital_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicDetails {
    pub name: String,
    #[serde(flatten)]
    pub address: PostalAddress,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemAdminDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub access_code: String,
}

/// Body for the organization-registration endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationPayload {
    pub name: String,
    pub organization_type: String,
    pub registration_number: String,
    pub contact_email: String,
    pub address: PostalAddress,
    pub capacity: BedCapacity,
    pub specialties: Vec<String>,
    pub accepts_insurance: bool,
    pub admin: OrganizationAdmin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BedCapacity {
    pub total_beds: u32,
    pub icu_beds: u32,
    pub emergency_beds: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationAdmin {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

impl RegistrationPayload {
    /// Role the payload registers
    pub fn role(&self) -> Role {
        match self {
            Self::Individual(p) => p.role,
            Self::Organization(_) => Role::OrganizationAdmin,
        }
    }

    /// Email of the account being created
    pub fn email(&self) -> &str {
        match self {
            Self::Individual(p) => &p.email,
            Self::Organization(p) => &p.admin.email,
        }
    }
}

/// Build the payload for `role` from completed values
pub fn assemble(role: Role, values: &FieldValues) -> Result<RegistrationPayload, AssemblyError> {
    (profile::lookup(Some(role)).assembler)(values)
}

pub(crate) fn assemble_without_role(
    _values: &FieldValues,
) -> Result<RegistrationPayload, AssemblyError> {
    Err(AssemblyError::MissingField("role"))
}

pub(crate) fn assemble_patient(values: &FieldValues) -> Result<RegistrationPayload, AssemblyError> {
    let details = RoleDetails::Patient(PatientDetails {
        emergency_contact: required_text(values, "emergencyContact")?,
        emergency_phone: required_text(values, "emergencyPhone")?,
        blood_type: values.text("bloodType"),
        allergies: list(values, "allergies"),
    });
    individual(values, Role::Patient, details)
}

pub(crate) fn assemble_doctor(values: &FieldValues) -> Result<RegistrationPayload, AssemblyError> {
    let practice = match PracticeType::selected(values) {
        Some(PracticeType::OwnClinic) => Practice::OwnClinic {
            clinic: ClinicDetails {
                name: required_text(values, "clinic.name")?,
                address: PostalAddress {
                    street: required_text(values, "clinic.street")?,
                    city: required_text(values, "clinic.city")?,
                    state: required_text(values, "clinic.state")?,
                    zip_code: required_text(values, "clinic.zipCode")?,
                },
            },
        },
        Some(PracticeType::Hospital) => Practice::Hospital {
            hospital_id: required_text(values, "hospitalId")?,
        },
        None if values.is_filled(crate::branch::PRACTICE_TYPE) => {
            return Err(AssemblyError::UnknownBranch(crate::branch::PRACTICE_TYPE))
        }
        None => return Err(AssemblyError::MissingField(crate::branch::PRACTICE_TYPE)),
    };

    let details = RoleDetails::Doctor(DoctorDetails {
        license_number: required_text(values, "licenseNumber")?,
        specialization: required_text(values, "specialization")?,
        years_of_experience: required_count(values, "yearsOfExperience")?,
        qualifications: list(values, "qualifications"),
        practice,
    });
    individual(values, Role::Doctor, details)
}

pub(crate) fn assemble_system_admin(
    values: &FieldValues,
) -> Result<RegistrationPayload, AssemblyError> {
    let details = RoleDetails::SystemAdmin(SystemAdminDetails {
        department: values.text("department"),
        access_code: required_text(values, "accessCode")?,
    });
    individual(values, Role::SystemAdmin, details)
}

pub(crate) fn assemble_organization(
    values: &FieldValues,
) -> Result<RegistrationPayload, AssemblyError> {
    Ok(RegistrationPayload::Organization(OrganizationPayload {
        name: required_text(values, "organizationName")?,
        organization_type: required_text(values, "organizationType")?,
        registration_number: required_text(values, "registrationNumber")?,
        contact_email: required_text(values, "contactEmail")?,
        address: PostalAddress {
            street: required_text(values, "address.street")?,
            city: required_text(values, "address.city")?,
            state: required_text(values, "address.state")?,
            zip_code: required_text(values, "address.zipCode")?,
        },
        capacity: BedCapacity {
            total_beds: required_count(values, "totalBeds")?,
            icu_beds: counter(values, "icuBeds"),
            emergency_beds: counter(values, "emergencyBeds"),
        },
        specialties: list(values, "specialties"),
        accepts_insurance: values
            .get("acceptsInsurance")
            .and_then(FieldValue::as_flag)
            .unwrap_or(false),
        admin: OrganizationAdmin {
            first_name: required_text(values, "firstName")?,
            last_name: required_text(values, "lastName")?,
            email: required_text(values, "email")?,
            password: secret(values, "password")?,
            phone: required_text(values, "adminPhone")?,
        },
    }))
}

fn individual(
    values: &FieldValues,
    role: Role,
    details: RoleDetails,
) -> Result<RegistrationPayload, AssemblyError> {
    Ok(RegistrationPayload::Individual(IndividualPayload {
        first_name: required_text(values, "firstName")?,
        last_name: required_text(values, "lastName")?,
        email: required_text(values, "email")?,
        password: secret(values, "password")?,
        role,
        phone: values.text("phone"),
        date_of_birth: values.text("dateOfBirth"),
        gender: values.text("gender"),
        address: values.text("address"),
        details,
    }))
}

fn required_text(values: &FieldValues, name: &'static str) -> Result<String, AssemblyError> {
    values.text(name).ok_or(AssemblyError::MissingField(name))
}

/// Passwords are submitted exactly as typed
fn secret(values: &FieldValues, name: &'static str) -> Result<String, AssemblyError> {
    match values.get(name) {
        Some(FieldValue::Text(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(AssemblyError::MissingField(name)),
    }
}

/// Required whole number; absence is an error, never a silent zero
fn required_count(values: &FieldValues, name: &'static str) -> Result<u32, AssemblyError> {
    let value = values
        .get(name)
        .filter(|v| !v.is_blank())
        .ok_or(AssemblyError::MissingField(name))?;
    value
        .as_integer()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or(AssemblyError::InvalidNumber(name))
}

/// Optional counter; blank or unreadable input becomes zero
fn counter(values: &FieldValues, name: &str) -> u32 {
    values
        .get(name)
        .and_then(FieldValue::as_integer)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}

fn list(values: &FieldValues, name: &str) -> Vec<String> {
    values.get(name).map(FieldValue::as_list).unwrap_or_default()
}
