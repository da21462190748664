//! Field catalogue, one fragment per concern
//!
//! Roles pick the fragments they need in [`crate::profile`].

use super::rules::{CrossFieldRule, FieldKind, FieldSpec, Fragment};
use crate::branch::{PracticeType, PRACTICE_TYPE};
use crate::state::Role;

const NAME: FieldKind = FieldKind::Text {
    min_len: Some(2),
    max_len: Some(50),
};

const SHORT_TEXT: FieldKind = FieldKind::Text {
    min_len: None,
    max_len: Some(100),
};

const STREET: FieldKind = FieldKind::Text {
    min_len: None,
    max_len: Some(200),
};

const GENDERS: &[&str] = &["male", "female", "other"];

const BLOOD_TYPES: &[&str] = &["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

const ORGANIZATION_TYPES: &[&str] = &["hospital", "clinic", "diagnostic_center", "pharmacy"];

/// Account fields every registration needs; also the fallback schema
pub const BASE: Fragment = Fragment {
    name: "base",
    fields: &[
        FieldSpec::required("firstName", "First name", NAME),
        FieldSpec::required("lastName", "Last name", NAME),
        FieldSpec::required("email", "Email", FieldKind::Email),
        FieldSpec::required("password", "Password", FieldKind::Password),
        FieldSpec::required(
            "confirmPassword",
            "Confirm password",
            FieldKind::Text {
                min_len: None,
                max_len: None,
            },
        ),
    ],
    rules: &[CrossFieldRule::MustMatch {
        field: "confirmPassword",
        other: "password",
        message: "Passwords do not match",
    }],
};

pub const PERSONAL: Fragment = Fragment {
    name: "personal",
    fields: &[
        FieldSpec::required("phone", "Phone number", FieldKind::Phone),
        FieldSpec::required_for("dateOfBirth", "Date of birth", FieldKind::Date, &[Role::Patient]),
        FieldSpec::optional("gender", "Gender", FieldKind::Choice { options: GENDERS }),
        FieldSpec::required_for("address", "Address", STREET, &[Role::Patient]),
    ],
    rules: &[],
};

pub const PATIENT: Fragment = Fragment {
    name: "patient",
    fields: &[
        FieldSpec::required(
            "emergencyContact",
            "Emergency contact",
            FieldKind::Text {
                min_len: Some(2),
                max_len: Some(100),
            },
        ),
        FieldSpec::required("emergencyPhone", "Emergency contact phone", FieldKind::Phone),
        FieldSpec::optional(
            "bloodType",
            "Blood type",
            FieldKind::Choice {
                options: BLOOD_TYPES,
            },
        ),
        FieldSpec::optional("allergies", "Allergies", FieldKind::List),
    ],
    rules: &[],
};

pub const DOCTOR: Fragment = Fragment {
    name: "doctor",
    fields: &[
        FieldSpec::required(
            "licenseNumber",
            "License number",
            FieldKind::Text {
                min_len: Some(5),
                max_len: Some(30),
            },
        ),
        FieldSpec::required(
            "specialization",
            "Specialization",
            FieldKind::Text {
                min_len: Some(2),
                max_len: Some(100),
            },
        ),
        FieldSpec::required(
            "yearsOfExperience",
            "Years of experience",
            FieldKind::Integer {
                min: Some(0),
                max: Some(70),
            },
        ),
        FieldSpec::optional("qualifications", "Qualifications", FieldKind::List),
        FieldSpec::required(
            PRACTICE_TYPE,
            "Practice type",
            FieldKind::Choice {
                options: PracticeType::OPTIONS,
            },
        ),
        FieldSpec::required_when(
            "clinic.name",
            "Clinic name",
            FieldKind::Text {
                min_len: Some(2),
                max_len: Some(120),
            },
            PRACTICE_TYPE,
            PracticeType::OWN_CLINIC,
        ),
        FieldSpec::required_when(
            "clinic.street",
            "Clinic street",
            STREET,
            PRACTICE_TYPE,
            PracticeType::OWN_CLINIC,
        ),
        FieldSpec::required_when(
            "clinic.city",
            "Clinic city",
            SHORT_TEXT,
            PRACTICE_TYPE,
            PracticeType::OWN_CLINIC,
        ),
        FieldSpec::required_when(
            "clinic.state",
            "Clinic state",
            SHORT_TEXT,
            PRACTICE_TYPE,
            PracticeType::OWN_CLINIC,
        ),
        FieldSpec::required_when(
            "clinic.zipCode",
            "Clinic postal code",
            FieldKind::PostalCode,
            PRACTICE_TYPE,
            PracticeType::OWN_CLINIC,
        ),
        FieldSpec::required_when(
            "hospitalId",
            "Hospital",
            FieldKind::Reference,
            PRACTICE_TYPE,
            PracticeType::HOSPITAL,
        ),
    ],
    rules: &[],
};

/// Organization record; the base fragment describes its administrator
pub const ORGANIZATION: Fragment = Fragment {
    name: "organization",
    fields: &[
        FieldSpec::required(
            "organizationName",
            "Organization name",
            FieldKind::Text {
                min_len: Some(2),
                max_len: Some(120),
            },
        ),
        FieldSpec::required(
            "organizationType",
            "Organization type",
            FieldKind::Choice {
                options: ORGANIZATION_TYPES,
            },
        ),
        FieldSpec::required(
            "registrationNumber",
            "Registration number",
            FieldKind::Text {
                min_len: Some(3),
                max_len: Some(50),
            },
        ),
        FieldSpec::required("contactEmail", "Contact email", FieldKind::Email),
        FieldSpec::required("adminPhone", "Administrator phone", FieldKind::Phone),
        FieldSpec::required("address.street", "Street", STREET),
        FieldSpec::required("address.city", "City", SHORT_TEXT),
        FieldSpec::required("address.state", "State", SHORT_TEXT),
        FieldSpec::required("address.zipCode", "Postal code", FieldKind::PostalCode),
        FieldSpec::required(
            "totalBeds",
            "Total beds",
            FieldKind::Integer {
                min: Some(1),
                max: Some(100_000),
            },
        ),
        FieldSpec::optional("icuBeds", "ICU beds", FieldKind::Counter),
        FieldSpec::optional("emergencyBeds", "Emergency beds", FieldKind::Counter),
        FieldSpec::optional("specialties", "Specialties", FieldKind::List),
        FieldSpec::optional("acceptsInsurance", "Accepts insurance", FieldKind::Flag),
    ],
    rules: &[],
};

pub const SYSTEM_ADMIN: Fragment = Fragment {
    name: "system-admin",
    fields: &[
        FieldSpec::optional("department", "Department", SHORT_TEXT),
        FieldSpec::required(
            "accessCode",
            "Access code",
            FieldKind::Text {
                min_len: Some(6),
                max_len: Some(32),
            },
        ),
    ],
    rules: &[],
};
