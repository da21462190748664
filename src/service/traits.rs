//! Trait abstraction for the registration backend to enable mocking in tests

use super::types::{Organization, OrganizationAck, RegisterResponse};
use crate::payload::{IndividualPayload, OrganizationPayload};
use anyhow::Result;
use async_trait::async_trait;

/// Backend operations the wizard depends on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// List organizations a doctor can pick as their hospital
    async fn lookup_organizations(&self) -> Result<Vec<Organization>>;

    /// Register an individual account
    async fn register(&self, payload: &IndividualPayload) -> Result<RegisterResponse>;

    /// Register an organization together with its administrator
    async fn register_organization(&self, payload: &OrganizationPayload)
        -> Result<OrganizationAck>;
}
