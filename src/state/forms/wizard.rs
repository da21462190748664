//! Registration wizard state machine
//!
//! Holds the chosen role, the collected values and the per-field errors, and
//! moves between steps. Transitions are synchronous; the only suspension
//! points are the submission and the organization lookup, both of which are
//! split into begin/complete halves so their pending state stays observable.

use super::field::{FieldValue, FieldValues};
use super::lookup::{LookupStatus, LookupTicket, OrganizationDirectory};
use crate::error::{LookupError, SubmissionError, WizardError};
use crate::payload::{self, RegistrationPayload};
use crate::schema::{resolve_schema_with, PasswordPolicy, ValidationErrorSet, ValidationSchema};
use crate::service::{self, Organization, RegistrationService, SubmissionReceipt};
use crate::state::Role;
use crate::steps::{self, StepId};
use serde::Serialize;
use std::collections::BTreeSet;

/// Where the wizard is in its lifecycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "reason", rename_all = "snake_case")]
pub enum WizardPhase {
    /// On one of the steps, accepting input
    #[default]
    Editing,
    /// Payload handed to the backend; every other action is refused
    Submitting,
    /// Registration accepted; collected data has been discarded
    Submitted,
    /// Backend refused or was unreachable; still on the last step with data intact
    SubmitFailed(String),
}

/// Result of a successful `advance` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved on to this step
    Moved(StepId),
    /// Last step validated; submission may proceed
    ReadyToSubmit,
    /// Validation failed on this many fields of the current step
    Blocked(usize),
}

#[derive(Debug, Clone)]
pub struct RegistrationWizard {
    policy: PasswordPolicy,
    role: Option<Role>,
    schema: ValidationSchema,
    steps: Vec<StepId>,
    current: usize,
    values: FieldValues,
    errors: ValidationErrorSet,
    phase: WizardPhase,
    ready_to_submit: bool,
    notice: Option<String>,
    directory: OrganizationDirectory,
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationWizard {
    /// Create a wizard on the role step with the default password policy
    pub fn new() -> Self {
        Self::with_policy(PasswordPolicy::default())
    }

    pub fn with_policy(policy: PasswordPolicy) -> Self {
        let schema = resolve_schema_with(None, policy);
        let values = schema.default_values();
        Self {
            policy,
            role: None,
            schema,
            steps: steps::planned_steps(None),
            current: 0,
            values,
            errors: ValidationErrorSet::new(),
            phase: WizardPhase::Editing,
            ready_to_submit: false,
            notice: None,
            directory: OrganizationDirectory::default(),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn schema(&self) -> &ValidationSchema {
        &self.schema
    }

    pub fn steps(&self) -> &[StepId] {
        &self.steps
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> StepId {
        self.steps[self.current]
    }

    pub fn is_last_step(&self) -> bool {
        self.current + 1 == self.steps.len()
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Every error from the latest passes, across steps
    pub fn errors(&self) -> &ValidationErrorSet {
        &self.errors
    }

    /// Errors for the fields the current step owns
    pub fn step_errors(&self) -> ValidationErrorSet {
        let fields = self.fields_in_scope();
        self.errors.scoped(fields.iter().map(String::as_str))
    }

    /// Fields the current step owns right now
    pub fn fields_in_scope(&self) -> BTreeSet<String> {
        steps::fields_for_step(self.current_step(), self.role, &self.values)
    }

    pub fn phase(&self) -> &WizardPhase {
        &self.phase
    }

    pub fn ready_to_submit(&self) -> bool {
        self.ready_to_submit
    }

    /// Page-level message from the last failed submission
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn organizations(&self) -> &[Organization] {
        self.directory.organizations()
    }

    pub fn lookup_status(&self) -> &LookupStatus {
        self.directory.status()
    }

    fn is_editable(&self) -> bool {
        matches!(
            self.phase,
            WizardPhase::Editing | WizardPhase::SubmitFailed(_)
        )
    }

    pub fn can_advance(&self) -> bool {
        self.is_editable() && (self.current > 0 || self.role.is_some())
    }

    pub fn can_retreat(&self) -> bool {
        self.is_editable() && self.current > 0
    }

    fn ensure_editable(&self) -> Result<(), WizardError> {
        match self.phase {
            WizardPhase::Submitting => Err(WizardError::SubmissionInFlight),
            WizardPhase::Submitted => Err(WizardError::AlreadySubmitted),
            WizardPhase::Editing | WizardPhase::SubmitFailed(_) => Ok(()),
        }
    }

    fn resume_editing(&mut self) {
        if matches!(self.phase, WizardPhase::SubmitFailed(_)) {
            self.phase = WizardPhase::Editing;
        }
    }

    /// Choose the role; only allowed on the first step
    ///
    /// Picking a different role discards every collected value.
    pub fn select_role(&mut self, role: Role) -> Result<(), WizardError> {
        self.ensure_editable()?;
        if self.current != 0 {
            return Err(WizardError::RoleLocked);
        }
        if self.role == Some(role) {
            return Ok(());
        }

        tracing::debug!(%role, previous = ?self.role, "role selected");
        self.role = Some(role);
        self.schema = resolve_schema_with(Some(role), self.policy);
        self.steps = steps::planned_steps(Some(role));
        self.values = self.schema.default_values();
        self.errors.clear();
        self.ready_to_submit = false;
        self.notice = None;
        self.directory.reset();
        Ok(())
    }

    /// Choose the role by wire name
    pub fn select_role_named(&mut self, name: &str) -> Result<(), WizardError> {
        let role = name.parse::<Role>()?;
        self.select_role(role)
    }

    /// Record a value for a field the current schema declares
    pub fn set_field(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), WizardError> {
        self.ensure_editable()?;
        if !self.schema.declares(name) {
            return Err(WizardError::UnknownField {
                field: name.to_string(),
                role: self
                    .role
                    .map_or_else(|| "base".to_string(), |r| r.to_string()),
            });
        }
        self.resume_editing();
        self.ready_to_submit = false;
        self.values.set(name, value);
        Ok(())
    }

    pub fn clear_field(&mut self, name: &str) -> Result<(), WizardError> {
        self.set_field(name, FieldValue::default())
    }

    /// Validate the current step and move on if it passes
    ///
    /// Only fields owned by the current step are checked or flagged.
    pub fn advance(&mut self) -> Result<Advance, WizardError> {
        self.ensure_editable()?;
        if self.current == 0 && self.role.is_none() {
            return Err(WizardError::RoleRequired);
        }
        self.resume_editing();

        let step = self.current_step();
        let scope = steps::fields_for_step(step, self.role, &self.values);
        let fresh = self.schema.validate_fields(&self.values, &scope);
        let failed = fresh.len();

        // Branch arms that are no longer selected must not keep stale errors.
        self.errors
            .clear_fields(&steps::step_field_universe(step, self.role));
        self.errors.replace_scope(&scope, fresh);

        if failed > 0 {
            tracing::debug!(%step, failed, "step validation failed");
            return Ok(Advance::Blocked(failed));
        }

        if self.is_last_step() {
            self.ready_to_submit = true;
            return Ok(Advance::ReadyToSubmit);
        }

        self.current += 1;
        let next = self.current_step();
        tracing::debug!(from = %step, to = %next, "advanced");
        Ok(Advance::Moved(next))
    }

    /// Go back one step, keeping values and errors
    pub fn retreat(&mut self) -> Result<StepId, WizardError> {
        self.ensure_editable()?;
        if self.current == 0 {
            return Err(WizardError::AtFirstStep);
        }
        self.resume_editing();
        self.current -= 1;
        self.ready_to_submit = false;
        Ok(self.current_step())
    }

    /// Validate everything and enter `Submitting`, returning the payload to send
    ///
    /// On validation failure the wizard stays on the last step with the full
    /// error set.
    pub fn begin_submit(&mut self) -> Result<RegistrationPayload, WizardError> {
        self.ensure_editable()?;
        let Some(role) = self.role else {
            return Err(WizardError::RoleRequired);
        };
        if !self.is_last_step() {
            return Err(WizardError::NotOnLastStep);
        }

        self.errors = self.schema.validate(&self.values);
        if !self.errors.is_empty() {
            self.ready_to_submit = false;
            tracing::debug!(failed = self.errors.len(), "submission blocked by validation");
            return Err(WizardError::Invalid(self.errors.len()));
        }

        let payload = payload::assemble(role, &self.values)?;
        self.phase = WizardPhase::Submitting;
        self.notice = None;
        tracing::info!(%role, "submitting registration");
        Ok(payload)
    }

    /// Land the backend's answer for the submission in flight
    pub fn complete_submit(
        &mut self,
        result: Result<SubmissionReceipt, SubmissionError>,
    ) -> Result<SubmissionReceipt, WizardError> {
        if self.phase != WizardPhase::Submitting {
            return Err(WizardError::NotSubmitting);
        }

        match result {
            Ok(receipt) => {
                tracing::info!(role = ?self.role, "registration accepted");
                self.phase = WizardPhase::Submitted;
                self.values.clear();
                self.errors.clear();
                self.ready_to_submit = false;
                self.directory.reset();
                Ok(receipt)
            }
            Err(err) => {
                tracing::warn!(%err, "registration rejected");
                let reason = err.to_string();
                self.phase = WizardPhase::SubmitFailed(reason.clone());
                self.notice = Some(reason);
                Err(err.into())
            }
        }
    }

    /// Validate, assemble and send the registration
    pub async fn submit<S>(&mut self, service: &S) -> Result<SubmissionReceipt, WizardError>
    where
        S: RegistrationService + ?Sized,
    {
        let payload = self.begin_submit()?;
        let result = service::deliver(service, &payload).await;
        self.complete_submit(result)
    }

    /// Start an organization lookup for the current role
    pub fn begin_organization_lookup(&mut self) -> LookupTicket {
        self.directory.begin(self.role)
    }

    /// Land a lookup result; stale results are dropped and `false` returned
    pub fn complete_organization_lookup(
        &mut self,
        ticket: LookupTicket,
        result: Result<Vec<Organization>, LookupError>,
    ) -> bool {
        self.directory.complete(ticket, self.role, result)
    }

    /// Fetch the organization directory from the backend
    pub async fn refresh_organizations<S>(&mut self, service: &S) -> bool
    where
        S: RegistrationService + ?Sized,
    {
        let ticket = self.begin_organization_lookup();
        let result = service::fetch_organizations(service).await;
        self.complete_organization_lookup(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{MockRegistrationService, OrganizationAck, RegisterResponse};
    use anyhow::anyhow;
    use pretty_assertions::assert_eq;

    fn fill(wizard: &mut RegistrationWizard, values: &[(&str, &str)]) {
        for (name, value) in values {
            wizard.set_field(name, *value).unwrap();
        }
    }

    const ACCOUNT: &[(&str, &str)] = &[
        ("firstName", "Ann"),
        ("lastName", "Lee"),
        ("email", "a@x.com"),
        ("password", "Passw0rd!"),
        ("confirmPassword", "Passw0rd!"),
    ];

    /// System admin wizard parked on its last step with valid data
    fn system_admin_on_last_step() -> RegistrationWizard {
        let mut wizard = RegistrationWizard::new();
        wizard.select_role(Role::SystemAdmin).unwrap();
        fill(&mut wizard, ACCOUNT);
        fill(
            &mut wizard,
            &[("phone", "+12345678"), ("accessCode", "root-2024")],
        );
        while !wizard.is_last_step() {
            assert!(matches!(wizard.advance().unwrap(), Advance::Moved(_)));
        }
        wizard
    }

    mod role_selection {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_new_starts_on_role_step() {
            let wizard = RegistrationWizard::new();
            assert_eq!(wizard.current_step(), StepId::Role);
            assert_eq!(wizard.role(), None);
            assert!(!wizard.can_advance());
            assert!(!wizard.can_retreat());
        }

        #[test]
        fn test_advance_without_role_is_rejected_without_change() {
            let mut wizard = RegistrationWizard::new();
            assert_eq!(wizard.advance(), Err(WizardError::RoleRequired));
            assert_eq!(wizard.current_index(), 0);
            assert!(wizard.errors().is_empty());
        }

        #[test]
        fn test_select_role_replans() {
            let mut wizard = RegistrationWizard::new();
            wizard.select_role(Role::Doctor).unwrap();
            assert_eq!(wizard.steps().len(), 5);
            assert!(wizard.schema().declares("licenseNumber"));
            assert!(wizard.can_advance());
        }

        #[test]
        fn test_role_change_resets_values() {
            let mut wizard = RegistrationWizard::new();
            wizard.select_role(Role::Doctor).unwrap();
            wizard.set_field("licenseNumber", "MED-12345").unwrap();
            wizard.set_field("firstName", "Ann").unwrap();

            wizard.select_role(Role::OrganizationAdmin).unwrap();
            assert_eq!(wizard.value("firstName"), None);
            assert_eq!(wizard.value("licenseNumber"), None);
            assert_eq!(
                wizard.value("specialties"),
                Some(&FieldValue::List(Vec::new()))
            );
        }

        #[test]
        fn test_reselecting_same_role_keeps_values() {
            let mut wizard = RegistrationWizard::new();
            wizard.select_role(Role::Patient).unwrap();
            wizard.set_field("firstName", "Ann").unwrap();
            wizard.select_role(Role::Patient).unwrap();
            assert_eq!(wizard.value("firstName"), Some(&FieldValue::text("Ann")));
        }

        #[test]
        fn test_role_locked_after_first_step() {
            let mut wizard = RegistrationWizard::new();
            wizard.select_role(Role::Patient).unwrap();
            wizard.advance().unwrap();
            assert_eq!(
                wizard.select_role(Role::Doctor),
                Err(WizardError::RoleLocked)
            );
            assert_eq!(wizard.role(), Some(Role::Patient));
        }

        #[test]
        fn test_select_role_named_unknown() {
            let mut wizard = RegistrationWizard::new();
            assert!(matches!(
                wizard.select_role_named("nurse"),
                Err(WizardError::UnknownRole(_))
            ));
            assert_eq!(wizard.role(), None);
        }
    }

    mod fields {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_unknown_field_rejected() {
            let mut wizard = RegistrationWizard::new();
            wizard.select_role(Role::Patient).unwrap();
            assert_eq!(
                wizard.set_field("hospitalId", "org-1"),
                Err(WizardError::UnknownField {
                    field: "hospitalId".into(),
                    role: "patient".into()
                })
            );
        }

        #[test]
        fn test_base_fields_accepted_before_role() {
            let mut wizard = RegistrationWizard::new();
            wizard.set_field("email", "a@x.com").unwrap();
            assert_eq!(wizard.value("email"), Some(&FieldValue::text("a@x.com")));
        }

        #[test]
        fn test_clear_field() {
            let mut wizard = RegistrationWizard::new();
            wizard.set_field("email", "a@x.com").unwrap();
            wizard.clear_field("email").unwrap();
            assert!(!wizard.values().is_filled("email"));
        }
    }

    mod navigation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_account_step_flags_only_its_fields() {
            let mut wizard = RegistrationWizard::new();
            wizard.select_role(Role::Patient).unwrap();
            wizard.advance().unwrap();
            assert_eq!(wizard.advance(), Ok(Advance::Blocked(5)));
            assert_eq!(wizard.current_step(), StepId::Account);
            assert!(!wizard.errors().contains("phone"));
            assert!(!wizard.errors().contains("emergencyContact"));
        }

        #[test]
        fn test_repeated_failed_advance_is_idempotent() {
            let mut wizard = RegistrationWizard::new();
            wizard.select_role(Role::Patient).unwrap();
            wizard.advance().unwrap();
            fill(&mut wizard, &[("email", "bad"), ("password", "short")]);

            wizard.advance().unwrap();
            let first = wizard.errors().clone();
            wizard.advance().unwrap();
            assert_eq!(wizard.errors(), &first);
        }

        #[test]
        fn test_fixing_fields_clears_their_errors_on_next_pass() {
            let mut wizard = RegistrationWizard::new();
            wizard.select_role(Role::Patient).unwrap();
            wizard.advance().unwrap();
            wizard.advance().unwrap();
            fill(&mut wizard, ACCOUNT);
            assert_eq!(wizard.advance(), Ok(Advance::Moved(StepId::Personal)));
            assert!(wizard.errors().is_empty());
        }

        #[test]
        fn test_retreat_keeps_values_and_other_errors() {
            let mut wizard = RegistrationWizard::new();
            wizard.select_role(Role::Patient).unwrap();
            wizard.advance().unwrap();
            fill(&mut wizard, ACCOUNT);
            wizard.advance().unwrap();
            assert_eq!(wizard.advance(), Ok(Advance::Blocked(3)));

            assert_eq!(wizard.retreat(), Ok(StepId::Account));
            assert_eq!(wizard.value("firstName"), Some(&FieldValue::text("Ann")));
            assert!(wizard.errors().contains("phone"));
            assert!(wizard.step_errors().is_empty());
        }

        #[test]
        fn test_retreat_from_first_step_rejected() {
            let mut wizard = RegistrationWizard::new();
            assert_eq!(wizard.retreat(), Err(WizardError::AtFirstStep));
        }

        #[test]
        fn test_last_step_exposes_ready_flag() {
            let mut wizard = system_admin_on_last_step();
            assert!(!wizard.ready_to_submit());
            assert_eq!(wizard.advance(), Ok(Advance::ReadyToSubmit));
            assert!(wizard.ready_to_submit());
            assert_eq!(wizard.current_step(), StepId::Access);
        }

        #[test]
        fn test_editing_clears_ready_flag() {
            let mut wizard = system_admin_on_last_step();
            wizard.advance().unwrap();
            wizard.set_field("department", "IT").unwrap();
            assert!(!wizard.ready_to_submit());
        }

        #[test]
        fn test_branch_switch_drops_stale_branch_errors() {
            let mut wizard = RegistrationWizard::new();
            wizard.select_role(Role::Doctor).unwrap();
            fill(&mut wizard, ACCOUNT);
            fill(
                &mut wizard,
                &[
                    ("phone", "+12345678"),
                    ("licenseNumber", "MED-12345"),
                    ("specialization", "Cardiology"),
                    ("yearsOfExperience", "12"),
                ],
            );
            for _ in 0..4 {
                wizard.advance().unwrap();
            }
            assert_eq!(wizard.current_step(), StepId::Practice);

            wizard.set_field("practiceType", "own_clinic").unwrap();
            assert_eq!(wizard.advance(), Ok(Advance::Blocked(5)));
            assert!(wizard.errors().contains("clinic.city"));

            wizard.set_field("practiceType", "hospital").unwrap();
            assert_eq!(wizard.advance(), Ok(Advance::Blocked(1)));
            assert!(!wizard.errors().contains("clinic.city"));
            assert!(wizard.errors().contains("hospitalId"));
        }
    }

    mod submission {
        use super::*;
        use pretty_assertions::assert_eq;

        fn accepting_service() -> MockRegistrationService {
            let mut mock = MockRegistrationService::new();
            mock.expect_register().times(1).returning(|_| {
                Ok(RegisterResponse {
                    success: true,
                    token: Some("t-1".into()),
                    user: None,
                    message: None,
                })
            });
            mock
        }

        #[test]
        fn test_submit_only_from_last_step() {
            let mut wizard = RegistrationWizard::new();
            wizard.select_role(Role::Patient).unwrap();
            assert_eq!(wizard.begin_submit(), Err(WizardError::NotOnLastStep));
        }

        #[test]
        fn test_submit_requires_role() {
            let mut wizard = RegistrationWizard::new();
            assert_eq!(wizard.begin_submit(), Err(WizardError::RoleRequired));
        }

        #[test]
        fn test_submitting_is_exclusive() {
            let mut wizard = system_admin_on_last_step();
            wizard.begin_submit().unwrap();
            assert_eq!(wizard.phase(), &WizardPhase::Submitting);
            assert_eq!(wizard.advance(), Err(WizardError::SubmissionInFlight));
            assert_eq!(wizard.retreat(), Err(WizardError::SubmissionInFlight));
            assert_eq!(
                wizard.set_field("department", "IT"),
                Err(WizardError::SubmissionInFlight)
            );
            assert_eq!(
                wizard.begin_submit(),
                Err(WizardError::SubmissionInFlight)
            );
            assert!(!wizard.can_advance());
            assert!(!wizard.can_retreat());
        }

        #[test]
        fn test_full_revalidation_catches_stale_steps() {
            let mut wizard = system_admin_on_last_step();
            // Invalidate a field on an earlier step without revisiting it.
            wizard.set_field("email", "not-an-email").unwrap();
            assert_eq!(wizard.begin_submit(), Err(WizardError::Invalid(1)));
            assert_eq!(wizard.phase(), &WizardPhase::Editing);
            assert_eq!(
                wizard.errors().get("email"),
                Some("Enter a valid email address")
            );
            assert_eq!(wizard.current_step(), StepId::Access);
        }

        #[test]
        fn test_complete_without_begin() {
            let mut wizard = system_admin_on_last_step();
            let result = wizard.complete_submit(Ok(SubmissionReceipt::Organization { message: None }));
            assert_eq!(result, Err(WizardError::NotSubmitting));
        }

        #[tokio::test]
        async fn test_successful_submit_discards_state() {
            let mut wizard = system_admin_on_last_step();
            let receipt = wizard.submit(&accepting_service()).await.unwrap();
            assert_eq!(
                receipt,
                SubmissionReceipt::Account {
                    token: Some("t-1".into()),
                    user: None,
                    message: None
                }
            );
            assert_eq!(wizard.phase(), &WizardPhase::Submitted);
            assert!(wizard.values().is_empty());
            assert_eq!(wizard.advance(), Err(WizardError::AlreadySubmitted));
        }

        #[tokio::test]
        async fn test_rejected_submit_keeps_data_for_retry() {
            let mut wizard = system_admin_on_last_step();
            let mut mock = MockRegistrationService::new();
            mock.expect_register().times(1).returning(|_| {
                Ok(RegisterResponse {
                    success: false,
                    message: Some("Email already registered".into()),
                    ..Default::default()
                })
            });

            let err = wizard.submit(&mock).await.unwrap_err();
            assert_eq!(
                err,
                WizardError::Submission(SubmissionError::Rejected(
                    "Email already registered".into()
                ))
            );
            assert_eq!(
                wizard.phase(),
                &WizardPhase::SubmitFailed("Email already registered".into())
            );
            assert_eq!(wizard.notice(), Some("Email already registered"));
            assert_eq!(wizard.value("accessCode"), Some(&FieldValue::text("root-2024")));
            assert_eq!(wizard.current_step(), StepId::Access);

            let receipt = wizard.submit(&accepting_service()).await;
            assert!(receipt.is_ok());
            assert_eq!(wizard.notice(), None);
        }

        #[tokio::test]
        async fn test_transport_failure_is_recoverable() {
            let mut wizard = system_admin_on_last_step();
            let mut mock = MockRegistrationService::new();
            mock.expect_register()
                .returning(|_| Err(anyhow!("connection reset")));

            let err = wizard.submit(&mock).await.unwrap_err();
            assert!(matches!(
                err,
                WizardError::Submission(SubmissionError::Transport(_))
            ));
            assert!(wizard.can_retreat());
            assert_eq!(wizard.retreat(), Ok(StepId::Personal));
            assert_eq!(wizard.phase(), &WizardPhase::Editing);
        }

        #[tokio::test]
        async fn test_organization_role_uses_organization_endpoint() {
            let mut wizard = RegistrationWizard::new();
            wizard.select_role(Role::OrganizationAdmin).unwrap();
            fill(&mut wizard, ACCOUNT);
            fill(
                &mut wizard,
                &[
                    ("adminPhone", "+12345678"),
                    ("organizationName", "General Hospital"),
                    ("organizationType", "hospital"),
                    ("registrationNumber", "REG-001"),
                    ("contactEmail", "info@general.org"),
                    ("address.street", "1 Care Way"),
                    ("address.city", "Springfield"),
                    ("address.state", "IL"),
                    ("address.zipCode", "62701"),
                    ("totalBeds", "40"),
                ],
            );
            while !wizard.is_last_step() {
                wizard.advance().unwrap();
            }

            let mut mock = MockRegistrationService::new();
            mock.expect_register().never();
            mock.expect_register_organization()
                .withf(|p| p.capacity.total_beds == 40 && p.capacity.icu_beds == 0)
                .times(1)
                .returning(|_| {
                    Ok(OrganizationAck {
                        success: true,
                        message: Some("received".into()),
                    })
                });

            let receipt = wizard.submit(&mock).await.unwrap();
            assert_eq!(
                receipt,
                SubmissionReceipt::Organization {
                    message: Some("received".into())
                }
            );
        }
    }

    mod organization_lookup {
        use super::*;
        use pretty_assertions::assert_eq;

        fn org(id: &str) -> Organization {
            Organization {
                id: id.into(),
                name: "General".into(),
                city: "Springfield".into(),
                state: "IL".into(),
            }
        }

        #[test]
        fn test_role_change_discards_pending_lookup() {
            let mut wizard = RegistrationWizard::new();
            wizard.select_role(Role::Doctor).unwrap();
            let ticket = wizard.begin_organization_lookup();
            assert_eq!(wizard.lookup_status(), &LookupStatus::Pending);

            wizard.select_role(Role::Patient).unwrap();
            assert!(!wizard.complete_organization_lookup(ticket, Ok(vec![org("1")])));
            assert!(wizard.organizations().is_empty());
            assert_eq!(wizard.lookup_status(), &LookupStatus::Idle);
        }

        #[tokio::test]
        async fn test_refresh_loads_organizations() {
            let mut wizard = RegistrationWizard::new();
            wizard.select_role(Role::Doctor).unwrap();
            let mut mock = MockRegistrationService::new();
            mock.expect_lookup_organizations()
                .returning(|| Ok(vec![org("1"), org("2")]));

            assert!(wizard.refresh_organizations(&mock).await);
            assert_eq!(wizard.organizations().len(), 2);
            assert_eq!(wizard.lookup_status(), &LookupStatus::Loaded);
        }

        #[tokio::test]
        async fn test_failed_refresh_keeps_values() {
            let mut wizard = RegistrationWizard::new();
            wizard.select_role(Role::Doctor).unwrap();
            wizard.set_field("firstName", "Ann").unwrap();
            let mut mock = MockRegistrationService::new();
            mock.expect_lookup_organizations()
                .returning(|| Err(anyhow!("offline")));

            assert!(wizard.refresh_organizations(&mock).await);
            assert!(wizard.organizations().is_empty());
            assert!(matches!(wizard.lookup_status(), LookupStatus::Failed(_)));
            assert_eq!(wizard.value("firstName"), Some(&FieldValue::text("Ann")));
        }
    }
}
