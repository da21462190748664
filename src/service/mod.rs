//! Registration backend collaborators

mod offline;
mod traits;
mod types;

pub use offline::OfflineRegistrationService;
pub use traits::RegistrationService;
pub use types::{Organization, OrganizationAck, RegisterResponse, SubmissionReceipt, UserSummary};

#[cfg(test)]
pub use traits::MockRegistrationService;

use crate::error::{LookupError, SubmissionError};
use crate::payload::RegistrationPayload;

const DEFAULT_REJECTION: &str = "Registration failed";

/// Send a payload to the endpoint matching its shape
pub async fn deliver<S>(
    service: &S,
    payload: &RegistrationPayload,
) -> Result<SubmissionReceipt, SubmissionError>
where
    S: RegistrationService + ?Sized,
{
    match payload {
        RegistrationPayload::Individual(body) => {
            let response = service
                .register(body)
                .await
                .map_err(|e| SubmissionError::Transport(format!("{e:#}")))?;
            if response.success {
                Ok(SubmissionReceipt::Account {
                    token: response.token,
                    user: response.user,
                    message: response.message,
                })
            } else {
                Err(SubmissionError::Rejected(
                    response
                        .message
                        .unwrap_or_else(|| DEFAULT_REJECTION.to_string()),
                ))
            }
        }
        RegistrationPayload::Organization(body) => {
            let ack = service
                .register_organization(body)
                .await
                .map_err(|e| SubmissionError::Transport(format!("{e:#}")))?;
            if ack.success {
                Ok(SubmissionReceipt::Organization {
                    message: ack.message,
                })
            } else {
                Err(SubmissionError::Rejected(
                    ack.message.unwrap_or_else(|| DEFAULT_REJECTION.to_string()),
                ))
            }
        }
    }
}

/// Fetch the organization directory
pub async fn fetch_organizations<S>(service: &S) -> Result<Vec<Organization>, LookupError>
where
    S: RegistrationService + ?Sized,
{
    service
        .lookup_organizations()
        .await
        .map_err(|e| LookupError(format!("{e:#}")))
}
