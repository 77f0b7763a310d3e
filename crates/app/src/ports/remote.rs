//! Remote port: the authenticated session with the SleepIQ service.

use std::future::Future;

use bedsync_domain::account::Credentials;
use bedsync_domain::bed::{BedSide, Snapshot};
use bedsync_domain::command::SleepNumber;
use bedsync_domain::error::RemoteError;
use bedsync_domain::foundation::{
    Actuator, BasePosition, FoundationFeatures, FoundationStatus, Preset, Speed,
};
use bedsync_domain::id::BedId;

/// A logged-in client for the bed vendor's cloud API.
///
/// How the session authenticates is the adapter's business. The only
/// contract is that an expired or rejected session surfaces as
/// [`RemoteError::Authentication`] so callers know to [`login`](Self::login)
/// again.
pub trait RemoteSession: Send + Sync {
    /// (Re-)establish the session with the configured credentials.
    fn login(&self) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Try `credentials` on a separate, throwaway session.
    ///
    /// The session this port holds is left untouched whatever the outcome.
    fn check_credentials(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Fetch every bed on the account with both sides' sleeper status.
    fn beds_with_sleeper_status(
        &self,
    ) -> impl Future<Output = Result<Snapshot, RemoteError>> + Send;

    fn foundation_status(
        &self,
        bed_id: &BedId,
    ) -> impl Future<Output = Result<FoundationStatus, RemoteError>> + Send;

    fn foundation_features(
        &self,
        bed_id: &BedId,
    ) -> impl Future<Output = Result<FoundationFeatures, RemoteError>> + Send;

    fn set_sleep_number(
        &self,
        bed_id: &BedId,
        side: BedSide,
        sleep_number: SleepNumber,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    fn set_preset(
        &self,
        bed_id: &BedId,
        side: BedSide,
        preset: Preset,
        speed: Speed,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    fn set_foundation_position(
        &self,
        bed_id: &BedId,
        side: BedSide,
        actuator: Actuator,
        position: BasePosition,
        speed: Speed,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;
}
