//! Organization directory lookup tracking
//!
//! The lookup is asynchronous; its result may arrive after the user changed
//! role or started another lookup. Each request gets a ticket and only the
//! latest ticket for the current role is allowed to land.

use crate::error::LookupError;
use crate::service::Organization;
use crate::state::Role;
use serde::Serialize;

/// Observable state of the directory lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum LookupStatus {
    #[default]
    Idle,
    Pending,
    Loaded,
    /// Failed; the list is empty and the lookup can be retried
    Failed(String),
}

/// Identifies one lookup request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupTicket {
    pub request_id: u64,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Default)]
pub struct OrganizationDirectory {
    status: LookupStatus,
    organizations: Vec<Organization>,
    latest: Option<LookupTicket>,
    next_request: u64,
}

impl OrganizationDirectory {
    pub fn status(&self) -> &LookupStatus {
        &self.status
    }

    pub fn organizations(&self) -> &[Organization] {
        &self.organizations
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, LookupStatus::Pending)
    }

    /// Start a request for `role`, superseding any request still in flight
    pub fn begin(&mut self, role: Option<Role>) -> LookupTicket {
        self.next_request += 1;
        let ticket = LookupTicket {
            request_id: self.next_request,
            role,
        };
        self.latest = Some(ticket);
        self.status = LookupStatus::Pending;
        ticket
    }

    /// Apply a result; returns false when the result was stale and dropped
    pub fn complete(
        &mut self,
        ticket: LookupTicket,
        current_role: Option<Role>,
        result: Result<Vec<Organization>, LookupError>,
    ) -> bool {
        if self.latest != Some(ticket) || ticket.role != current_role {
            tracing::debug!(
                request_id = ticket.request_id,
                "discarding stale organization lookup result"
            );
            return false;
        }

        self.latest = None;
        match result {
            Ok(organizations) => {
                self.organizations = organizations;
                self.status = LookupStatus::Loaded;
            }
            Err(err) => {
                tracing::warn!(%err, "organization lookup failed; continuing with an empty list");
                self.organizations.clear();
                self.status = LookupStatus::Failed(err.to_string());
            }
        }
        true
    }

    /// Forget loaded data and any request in flight
    pub fn reset(&mut self) {
        self.status = LookupStatus::Idle;
        self.organizations.clear();
        self.latest = None;
    }
}
