//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`BedSyncError`]
//! via `#[from]`. The variants mirror the failure classes the integration
//! has to tell apart: remote failures (authentication vs. transport),
//! malformed user input, and commands aimed at beds lacking a capability.

/// Top-level error for every fallible operation in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum BedSyncError {
    #[error("remote service error")]
    Remote(#[from] RemoteError),

    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("unsupported feature")]
    Unsupported(#[from] UnsupportedFeatureError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The account has no beds registered.
    #[error("there are no beds associated with this SleepIQ account")]
    NoBeds,

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Failure reported by the remote session client.
///
/// Authentication is kept apart from everything else because it is the only
/// failure the poll loop reacts to (with a re-login).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// Credentials were rejected or the session expired.
    #[error("authentication rejected: {0}")]
    Authentication(String),

    /// Network or service failure unrelated to authentication.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The service answered with a payload that could not be understood.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// Whether this error should trigger a re-login.
    #[must_use]
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}

/// Malformed user-supplied values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("the SleepNumber \"{0}\" is invalid: it must be between 0 and 100 and a multiple of 5")]
    InvalidSleepNumber(i64),

    #[error("preset \"{0}\" is not a known FlexFit preset (expected 1 to 6)")]
    InvalidPreset(i64),

    #[error("speed \"{0}\" is invalid (expected 0 for fast or 1 for slow)")]
    InvalidSpeed(i64),

    #[error("side \"{0}\" is invalid (expected L or R)")]
    InvalidSide(String),

    #[error("actuator \"{0}\" is invalid (expected H or F)")]
    InvalidActuator(String),

    #[error("sensor action \"{0}\" is not recognised")]
    InvalidSensorAction(String),

    #[error("no SleepNumber bed was selected for this device")]
    MissingBedId,

    #[error("device id must not be empty")]
    EmptyDeviceId,

    #[error("the SleepIQ username is blank")]
    BlankUsername,

    #[error("the SleepIQ password is blank")]
    BlankPassword,
}

/// A command was aimed at a device whose bed lacks the needed hardware.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("the \"{device}\" doesn't support {feature}; no action taken")]
pub struct UnsupportedFeatureError {
    pub device: String,
    pub feature: &'static str,
}

/// The requested record does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
