//! Form domain layer
//!
//! Field values, the registration wizard and its rendering projection.

mod field;
mod lookup;
mod view;
mod wizard;

pub use field::{FieldValue, FieldValues};
pub use lookup::{LookupStatus, LookupTicket, OrganizationDirectory};
pub use view::{FieldView, StepView};
pub use wizard::{Advance, RegistrationWizard, WizardPhase};
