//! In-process registration backend
//!
//! Stands in for the HTTP backend when the wizard is driven from the command
//! line: serves a fixed organization directory and keeps what it registers in
//! memory.

use super::traits::RegistrationService;
use super::types::{Organization, OrganizationAck, RegisterResponse, UserSummary};
use crate::payload::{IndividualPayload, OrganizationPayload};
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Backend that never leaves the process
#[derive(Debug, Default)]
pub struct OfflineRegistrationService {
    directory: Vec<Organization>,
    accounts: Mutex<Vec<IndividualPayload>>,
    organizations: Mutex<Vec<OrganizationPayload>>,
}

impl OfflineRegistrationService {
    /// Create a backend serving the given organization directory
    pub fn new(directory: Vec<Organization>) -> Self {
        Self {
            directory,
            ..Default::default()
        }
    }

    /// Individual accounts registered so far
    pub async fn accounts(&self) -> Vec<IndividualPayload> {
        self.accounts.lock().await.clone()
    }

    /// Organizations registered so far
    pub async fn organizations(&self) -> Vec<OrganizationPayload> {
        self.organizations.lock().await.clone()
    }
}

#[async_trait]
impl RegistrationService for OfflineRegistrationService {
    async fn lookup_organizations(&self) -> Result<Vec<Organization>> {
        tracing::debug!(count = self.directory.len(), "serving organization directory");
        Ok(self.directory.clone())
    }

    async fn register(&self, payload: &IndividualPayload) -> Result<RegisterResponse> {
        let mut accounts = self.accounts.lock().await;
        if accounts
            .iter()
            .any(|a| a.email.eq_ignore_ascii_case(&payload.email))
        {
            return Ok(RegisterResponse {
                success: false,
                message: Some("An account with this email already exists".to_string()),
                ..Default::default()
            });
        }

        accounts.push(payload.clone());
        let user = UserSummary {
            id: Uuid::new_v4().to_string(),
            email: payload.email.clone(),
            first_name: payload.first_name.clone(),
            last_name: payload.last_name.clone(),
            role: payload.role.as_str().to_string(),
        };
        Ok(RegisterResponse {
            success: true,
            token: Some(Uuid::new_v4().simple().to_string()),
            user: Some(user),
            message: Some("Registration successful".to_string()),
        })
    }

    async fn register_organization(
        &self,
        payload: &OrganizationPayload,
    ) -> Result<OrganizationAck> {
        let mut organizations = self.organizations.lock().await;
        if organizations
            .iter()
            .any(|o| o.registration_number == payload.registration_number)
        {
            return Ok(OrganizationAck {
                success: false,
                message: Some(format!(
                    "Registration number {} is already in use",
                    payload.registration_number
                )),
            });
        }

        organizations.push(payload.clone());
        Ok(OrganizationAck {
            success: true,
            message: Some("Organization registration submitted for review".to_string()),
        })
    }
}
