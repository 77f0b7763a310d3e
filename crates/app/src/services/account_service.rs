//! Account service: credential checks and the bed list used for pairing.

use bedsync_domain::account::{AccountStatus, BedChoice, Credentials};
use bedsync_domain::error::{BedSyncError, ValidationError};

use crate::ports::RemoteSession;

/// Application service for account-level operations.
pub struct AccountService<R> {
    remote: R,
}

impl<R: RemoteSession> AccountService<R> {
    /// Create a new service on top of the daemon's session.
    pub fn new(remote: R) -> Self {
        Self { remote }
    }

    /// Check submitted credentials against the service.
    ///
    /// The check runs on a throwaway session, so the daemon stays logged in
    /// with its configured account whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::BlankUsername`] or
    /// [`ValidationError::BlankPassword`] before any remote call is made.
    #[tracing::instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn verify(
        &self,
        credentials: &Credentials,
    ) -> Result<AccountStatus, ValidationError> {
        credentials.validate()?;

        let status = match self.remote.check_credentials(credentials).await {
            Ok(()) => AccountStatus::Verified,
            Err(err) if err.is_authentication() => AccountStatus::Rejected,
            Err(err) => {
                tracing::error!("Unable to connect to the SleepIQ service. Error: {err}");
                AccountStatus::Unreachable(err.to_string())
            }
        };
        tracing::debug!(?status, "credentials checked");
        Ok(status)
    }

    /// List the beds on the account, in service order, as pairing choices.
    ///
    /// # Errors
    ///
    /// Returns the remote failure of the fetch.
    #[tracing::instrument(skip(self))]
    pub async fn list_beds(&self) -> Result<Vec<BedChoice>, BedSyncError> {
        let beds = self.remote.beds_with_sleeper_status().await?;
        let choices: Vec<BedChoice> = beds
            .into_iter()
            .map(|bed| BedChoice {
                name: bed.display_name().to_string(),
                bed_id: bed.bed_id,
            })
            .collect();
        tracing::debug!(count = choices.len(), "listed beds");
        Ok(choices)
    }
}
