//! regwiz - role-conditioned registration wizard
//!
//! Collects account data across a sequence of steps whose shape depends on
//! the chosen role, validates it against a per-role schema and submits the
//! assembled payload through a [`service::RegistrationService`].

pub mod branch;
pub mod config;
pub mod error;
pub mod payload;
pub mod profile;
pub mod schema;
pub mod script;
pub mod service;
pub mod state;
pub mod steps;

pub use error::WizardError;
pub use state::{Advance, FieldValue, FieldValues, RegistrationWizard, Role, StepView, WizardPhase};
