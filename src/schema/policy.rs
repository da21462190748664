//! Shared password policy
//!
//! Both registration surfaces (individual accounts and organization
//! administrators) create the same kind of account, so they share one
//! minimum length.

use serde::{Deserialize, Serialize};

/// Minimum password length used when nothing else is configured
pub const DEFAULT_PASSWORD_MIN_LENGTH: usize = 8;

/// Configured minimums below this are raised to it
pub const PASSWORD_MIN_LENGTH_FLOOR: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_PASSWORD_MIN_LENGTH,
        }
    }
}

impl PasswordPolicy {
    /// Create a policy, clamping the minimum up to the floor
    pub fn new(min_length: usize) -> Self {
        Self {
            min_length: min_length.max(PASSWORD_MIN_LENGTH_FLOOR),
        }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Check a candidate password, returning the message to show on failure
    pub fn check(&self, password: &str) -> Option<String> {
        if password.chars().count() < self.min_length {
            Some(format!(
                "Password must be at least {} characters",
                self.min_length
            ))
        } else {
            None
        }
    }
}
