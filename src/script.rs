//! Scripted wizard sessions
//!
//! The binary drives the wizard from a JSON list of actions instead of a
//! terminal UI. Each action maps onto one wizard operation; failures are
//! recorded and the script carries on, the way a user would after seeing an
//! error.

use crate::service::{RegistrationService, SubmissionReceipt};
use crate::state::{Advance, FieldValue, RegistrationWizard, StepView};
use serde::{Deserialize, Serialize};

/// One user action
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptAction {
    SelectRole { role: String },
    Set { field: String, value: FieldValue },
    Clear { field: String },
    Advance,
    Retreat,
    LookupOrganizations,
    Submit,
}

impl ScriptAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectRole { .. } => "select_role",
            Self::Set { .. } => "set",
            Self::Clear { .. } => "clear",
            Self::Advance => "advance",
            Self::Retreat => "retreat",
            Self::LookupOrganizations => "lookup_organizations",
            Self::Submit => "submit",
        }
    }
}

/// What happened when an action was applied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionOutcome {
    pub index: usize,
    pub action: &'static str,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptReport {
    pub outcomes: Vec<ActionOutcome>,
    pub view: StepView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<SubmissionReceipt>,
}

impl ScriptReport {
    pub fn failures(&self) -> impl Iterator<Item = &ActionOutcome> {
        self.outcomes.iter().filter(|o| !o.ok)
    }
}

pub fn parse_script(source: &str) -> serde_json::Result<Vec<ScriptAction>> {
    serde_json::from_str(source)
}

/// Apply `actions` in order against `wizard`
pub async fn run_script<S>(
    wizard: &mut RegistrationWizard,
    service: &S,
    actions: Vec<ScriptAction>,
) -> ScriptReport
where
    S: RegistrationService + ?Sized,
{
    let mut outcomes = Vec::with_capacity(actions.len());
    let mut receipt = None;

    for (index, action) in actions.into_iter().enumerate() {
        let name = action.name();
        let result = match action {
            ScriptAction::SelectRole { role } => wizard.select_role_named(&role).map(|()| None),
            ScriptAction::Set { field, value } => wizard.set_field(&field, value).map(|()| None),
            ScriptAction::Clear { field } => wizard.clear_field(&field).map(|()| None),
            ScriptAction::Advance => wizard.advance().map(|outcome| match outcome {
                Advance::Moved(step) => Some(format!("moved to {step}")),
                Advance::ReadyToSubmit => Some("ready to submit".to_string()),
                Advance::Blocked(count) => Some(format!("blocked by {count} invalid field(s)")),
            }),
            ScriptAction::Retreat => wizard.retreat().map(|step| Some(format!("back to {step}"))),
            ScriptAction::LookupOrganizations => {
                let detail = if wizard.refresh_organizations(service).await {
                    format!("{} organization(s) available", wizard.organizations().len())
                } else {
                    "stale lookup result discarded".to_string()
                };
                Ok(Some(detail))
            }
            ScriptAction::Submit => wizard.submit(service).await.map(|r| {
                receipt = Some(r);
                None
            }),
        };

        let outcome = match result {
            Ok(detail) => ActionOutcome {
                index,
                action: name,
                ok: true,
                detail,
            },
            Err(err) => {
                tracing::debug!(index, action = name, %err, "script action refused");
                ActionOutcome {
                    index,
                    action: name,
                    ok: false,
                    detail: Some(err.to_string()),
                }
            }
        };
        outcomes.push(outcome);
    }

    ScriptReport {
        outcomes,
        view: wizard.view(),
        receipt,
    }
}
