//! Account: the SleepIQ credentials and the result of checking them.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::BedId;

/// Username and password for the SleepIQ account.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Reject blank (empty or whitespace-only) fields.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::BlankUsername`] or
    /// [`ValidationError::BlankPassword`], username checked first.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::BlankUsername);
        }
        if self.password.trim().is_empty() {
            return Err(ValidationError::BlankPassword);
        }
        Ok(())
    }
}

// Never print the password.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Outcome of a credentials check against the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum AccountStatus {
    Verified,
    /// The service refused the credentials.
    Rejected,
    /// The service could not be reached.
    Unreachable(String),
}

/// A bed offered when pairing a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BedChoice {
    pub bed_id: BedId,
    pub name: String,
}
