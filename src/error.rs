//! Error taxonomy for the registration wizard
//!
//! Per-field validation problems are not errors here: they are collected
//! into a [`ValidationErrorSet`](crate::schema::ValidationErrorSet) and shown
//! inline. The types below cover rejected transitions and collaborator
//! failures.

use thiserror::Error;

/// A role name that is not one of the known variants
///
/// Schema resolution recovers from this by falling back to the base schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(pub String);

/// The organization directory could not be fetched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("organization lookup failed: {0}")]
pub struct LookupError(pub String);

/// The registration collaborator did not accept the payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("{0}")]
    Rejected(String),
    #[error("registration service unavailable: {0}")]
    Transport(String),
}

/// A payload could not be built from the collected values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    #[error("required field `{0}` is missing")]
    MissingField(&'static str),
    #[error("field `{0}` is not a valid number")]
    InvalidNumber(&'static str),
    #[error("`{0}` does not name a known branch")]
    UnknownBranch(&'static str),
}

/// A wizard action that was refused without changing state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("the role can only be changed on the first step")]
    RoleLocked,
    #[error("choose a role before continuing")]
    RoleRequired,
    #[error(transparent)]
    UnknownRole(#[from] UnknownRole),
    #[error("field `{field}` is not part of the {role} registration")]
    UnknownField { field: String, role: String },
    #[error("already on the first step")]
    AtFirstStep,
    #[error("registration can only be submitted from the last step")]
    NotOnLastStep,
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("no submission is in flight")]
    NotSubmitting,
    #[error("registration has already been submitted")]
    AlreadySubmitted,
    #[error("{0} field(s) need attention before submitting")]
    Invalid(usize),
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_role_message() {
        assert_eq!(UnknownRole("nurse".into()).to_string(), "unknown role `nurse`");
    }

    #[test]
    fn test_rejected_submission_shows_backend_message() {
        let err = SubmissionError::Rejected("Email already registered".into());
        assert_eq!(err.to_string(), "Email already registered");
    }

    #[test]
    fn test_wizard_error_wraps_submission() {
        let err: WizardError = SubmissionError::Transport("timeout".into()).into();
        assert_eq!(
            err.to_string(),
            "registration service unavailable: timeout"
        );
    }

    #[test]
    fn test_unknown_field_message() {
        let err = WizardError::UnknownField {
            field: "hospitalId".into(),
            role: "patient".into(),
        };
        assert_eq!(
            err.to_string(),
            "field `hospitalId` is not part of the patient registration"
        );
    }
}
