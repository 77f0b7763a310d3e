//! SleepIQ adapter error types.

use bedsync_domain::error::{BedSyncError, RemoteError};

/// Errors specific to the SleepIQ client.
#[derive(Debug, thiserror::Error)]
pub enum SleepIqError {
    /// No session key yet; a login is required first.
    #[error("not logged in to SleepIQ")]
    NotLoggedIn,

    /// The service answered 401.
    #[error("SleepIQ rejected the session during {action}")]
    Unauthorized { action: String },

    /// The service answered with another non-success status.
    #[error("SleepIQ error during {action}: {details}")]
    Status { action: String, details: String },

    /// The request could not be sent or the response not read.
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// The configured base URL or an endpoint path is not a valid URL.
    #[error("invalid SleepIQ URL")]
    Url(#[from] url::ParseError),

    /// A response body did not match the expected shape.
    #[error("failed to decode SleepIQ response from {action}")]
    Decode {
        action: String,
        #[source]
        source: serde_json::Error,
    },

    /// `fsBoardFeatures` was neither a number nor a hexadecimal string.
    #[error("invalid foundation feature flags \"{0}\"")]
    InvalidFeatures(String),
}

impl SleepIqError {
    /// Convert into a [`RemoteError`] for propagation across port boundaries.
    #[must_use]
    pub fn into_remote(self) -> RemoteError {
        let message = error_chain(&self);
        match self {
            Self::NotLoggedIn | Self::Unauthorized { .. } => RemoteError::Authentication(message),
            Self::Decode { .. } | Self::InvalidFeatures(_) => RemoteError::Decode(message),
            Self::Status { .. } | Self::Http(_) | Self::Url(_) => RemoteError::Transport(message),
        }
    }
}

impl From<SleepIqError> for RemoteError {
    fn from(err: SleepIqError) -> Self {
        err.into_remote()
    }
}

impl From<SleepIqError> for BedSyncError {
    fn from(err: SleepIqError) -> Self {
        Self::Remote(err.into_remote())
    }
}

// Flatten the source chain so the message survives the conversion.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
