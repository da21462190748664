//! Read-only projection of the wizard for whatever renders it

use super::field::FieldValue;
use super::lookup::LookupStatus;
use super::wizard::{RegistrationWizard, WizardPhase};
use crate::schema::{FieldKind, ValidationErrorSet};
use crate::service::Organization;
use crate::state::Role;
use crate::steps::{self, StepId};
use serde::Serialize;

/// One field as it should be rendered on the current step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything needed to draw the current step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepView {
    pub step: StepId,
    pub label: &'static str,
    pub index: usize,
    pub total: usize,
    pub role: Option<Role>,
    pub fields: Vec<FieldView>,
    /// Errors for the fields on this step only
    pub errors: ValidationErrorSet,
    pub can_advance: bool,
    pub can_retreat: bool,
    pub is_last_step: bool,
    pub ready_to_submit: bool,
    pub phase: WizardPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub lookup: LookupStatus,
    pub organizations: Vec<Organization>,
}

impl StepView {
    pub fn field(&self, name: &str) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == WizardPhase::Submitting
    }
}

impl RegistrationWizard {
    /// Project the current step for rendering
    pub fn view(&self) -> StepView {
        let step = self.current_step();
        let role = self.role();
        let values = self.values();
        let errors = self.step_errors();
        let schema = self.schema();

        let fields = steps::ordered_fields_for_step(step, role, values)
            .into_iter()
            .filter_map(|name| {
                let rule = schema.field(name)?;
                Some(FieldView {
                    name: rule.name,
                    label: rule.label,
                    kind: rule.kind,
                    required: schema.is_required(name, values),
                    value: values.get(name).cloned(),
                    error: errors.get(name).map(str::to_string),
                })
            })
            .collect();

        StepView {
            step,
            label: steps::step_definition(step, role).map_or(step.as_str(), |d| d.label),
            index: self.current_index(),
            total: self.steps().len(),
            role,
            fields,
            errors,
            can_advance: self.can_advance(),
            can_retreat: self.can_retreat(),
            is_last_step: self.is_last_step(),
            ready_to_submit: self.ready_to_submit(),
            phase: self.phase().clone(),
            notice: self.notice().map(str::to_string),
            lookup: self.lookup_status().clone(),
            organizations: self.organizations().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_role_step_view() {
        let view = RegistrationWizard::new().view();
        assert_eq!(view.step, StepId::Role);
        assert_eq!(view.label, "Choose your role");
        assert_eq!(view.total, 2);
        assert!(view.fields.is_empty());
        assert!(!view.can_advance);
    }

    #[test]
    fn test_view_orders_fields_and_marks_required() {
        let mut wizard = RegistrationWizard::new();
        wizard.select_role(Role::Doctor).unwrap();
        for (name, value) in [
            ("firstName", "Ann"),
            ("lastName", "Lee"),
            ("email", "a@x.com"),
            ("password", "Passw0rd!"),
            ("confirmPassword", "Passw0rd!"),
        ] {
            wizard.set_field(name, value).unwrap();
        }
        wizard.advance().unwrap();
        wizard.advance().unwrap();

        let personal = wizard.view();
        assert_eq!(personal.step, StepId::Personal);
        let names: Vec<_> = personal.fields.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["phone", "dateOfBirth", "gender", "address"]);
        // Date of birth is only mandatory for patients.
        assert_eq!(personal.field("dateOfBirth").map(|f| f.required), Some(false));
    }

    #[test]
    fn test_view_shows_only_step_errors() {
        let mut wizard = RegistrationWizard::new();
        wizard.select_role(Role::Patient).unwrap();
        wizard.advance().unwrap();
        wizard.set_field("email", "nope").unwrap();
        wizard.advance().unwrap();

        let view = wizard.view();
        assert_eq!(
            view.field("email").and_then(|f| f.error.as_deref()),
            Some("Enter a valid email address")
        );
        assert_eq!(view.errors.len(), 5);
    }

    #[test]
    fn test_practice_view_follows_branch() {
        let mut wizard = RegistrationWizard::new();
        wizard.select_role(Role::Doctor).unwrap();
        wizard.set_field("practiceType", "hospital").unwrap();
        let fields = steps::ordered_fields_for_step(StepId::Practice, Some(Role::Doctor), wizard.values());
        assert_eq!(fields, vec!["practiceType", "hospitalId"]);
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let json = serde_json::to_value(RegistrationWizard::new().view()).unwrap();
        assert_eq!(json["canAdvance"], false);
        assert_eq!(json["phase"]["phase"], "editing");
        assert_eq!(json["lookup"]["status"], "idle");
    }
}
