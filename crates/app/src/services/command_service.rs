//! Command service: validated bed commands and sensor actions.
//!
//! Every rejection is logged at error level and returned; no remote call is
//! made for a rejected command. Remote failures are logged and returned as
//! they are, never retried.

use bedsync_domain::bed::BedSide;
use bedsync_domain::command::{BedCommand, SensorAction, SleepNumber};
use bedsync_domain::device::LocalDevice;
use bedsync_domain::error::{
    BedSyncError, NotFoundError, RemoteError, UnsupportedFeatureError, ValidationError,
};
use bedsync_domain::foundation::{Actuator, BasePosition, Preset, Speed};
use bedsync_domain::id::{BedId, LocalDeviceId};

use super::error_memo::ErrorMemo;
use super::reconcile::{ReconcileSummary, Reconciler};
use crate::ports::{DeviceStore, RemoteSession};

/// What a sensor action ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorOutcome {
    /// On/off/toggle on a read-only sensor.
    Ignored,
    /// The account was fetched and reconciled.
    Refreshed(ReconcileSummary),
}

/// Application service for commands aimed at a bed device.
pub struct CommandService<R, S> {
    reconciler: Reconciler<R, S>,
}

impl<R: RemoteSession, S: DeviceStore> CommandService<R, S> {
    /// Create a new service backed by the given ports.
    pub fn new(remote: R, store: S) -> Self {
        Self {
            reconciler: Reconciler::new(remote, store),
        }
    }

    /// Set the firmness of one side.
    ///
    /// # Errors
    ///
    /// Returns [`BedSyncError::Validation`] when `value` is not a multiple of 5
    /// within `0..=100`, [`BedSyncError::NotFound`] for an unknown device, or
    /// the remote failure.
    #[tracing::instrument(skip(self))]
    pub async fn set_sleep_number(
        &self,
        device_id: &LocalDeviceId,
        side: BedSide,
        value: i64,
    ) -> Result<(), BedSyncError> {
        let (device, bed_id) = self.bound_device(device_id).await?;
        let sleep_number = SleepNumber::new(value).inspect_err(log_rejection)?;

        let command = BedCommand::SetSleepNumber { side, sleep_number };
        self.dispatch(&device, &command, || {
            self.remote().set_sleep_number(&bed_id, side, sleep_number)
        })
        .await
    }

    /// Move one side of the foundation to a FlexFit preset.
    ///
    /// # Errors
    ///
    /// Returns [`BedSyncError::Unsupported`] when the bed has no foundation,
    /// [`BedSyncError::Validation`] for an unknown preset or speed, or the
    /// remote failure.
    #[tracing::instrument(skip(self))]
    pub async fn select_preset(
        &self,
        device_id: &LocalDeviceId,
        side: BedSide,
        preset_id: i64,
        speed: i64,
    ) -> Result<(), BedSyncError> {
        let (device, bed_id) = self.bound_device(device_id).await?;
        require(&device, device.has_foundation(), "FlexFit presets")?;
        let preset = Preset::try_from(preset_id).inspect_err(log_rejection)?;
        let speed = Speed::try_from(speed).inspect_err(log_rejection)?;

        let command = BedCommand::SelectPreset {
            side,
            preset,
            speed,
        };
        self.dispatch(&device, &command, || {
            self.remote().set_preset(&bed_id, side, preset, speed)
        })
        .await
    }

    /// Move one actuator of one side to an absolute position.
    ///
    /// The position is clamped into `0..=100`.
    ///
    /// # Errors
    ///
    /// Returns [`BedSyncError::Unsupported`] when the bed has no foundation or
    /// the foot is requested on a base without foot control,
    /// [`BedSyncError::Validation`] for an unknown speed, or the remote failure.
    #[tracing::instrument(skip(self))]
    pub async fn set_base_position(
        &self,
        device_id: &LocalDeviceId,
        side: BedSide,
        actuator: Actuator,
        position: i64,
        speed: i64,
    ) -> Result<(), BedSyncError> {
        let (device, bed_id) = self.bound_device(device_id).await?;
        require(&device, device.has_foundation(), "base adjustments")?;
        if actuator == Actuator::Foot {
            require(&device, device.has_foot_control(), "foot adjustments")?;
        }
        let speed = Speed::try_from(speed).inspect_err(log_rejection)?;
        let position = BasePosition::clamped(position);

        let command = BedCommand::SetBasePosition {
            side,
            actuator,
            position,
            speed,
        };
        self.dispatch(&device, &command, || {
            self.remote()
                .set_foundation_position(&bed_id, side, actuator, position, speed)
        })
        .await
    }

    /// Handle a generic sensor action sent by the host.
    ///
    /// On/off/toggle are ignored since the device is a read-only sensor. A
    /// status request fetches the account and reconciles right away; its
    /// failures are returned to the caller rather than rate-limited.
    ///
    /// # Errors
    ///
    /// Returns [`BedSyncError::NotFound`] for an unknown device,
    /// [`BedSyncError::NoBeds`] when the account is empty, or the remote or
    /// storage failure of the refresh.
    #[tracing::instrument(skip(self))]
    pub async fn handle_sensor_action(
        &self,
        device_id: &LocalDeviceId,
        action: SensorAction,
    ) -> Result<SensorOutcome, BedSyncError> {
        let device = self.device(device_id).await?;

        if action != SensorAction::RequestStatus {
            tracing::info!(
                "ignored \"{}\" {} request (sensor is read-only)",
                device.name,
                action.verb()
            );
            return Ok(SensorOutcome::Ignored);
        }

        tracing::info!("sent \"{}\" status request", device.name);
        let snapshot = self
            .remote()
            .beds_with_sleeper_status()
            .await
            .inspect_err(|err| {
                tracing::error!(
                    "Unable to load the list of beds associated with this SleepIQ account. Error: {err}"
                );
            })?;
        if snapshot.is_empty() {
            let err = BedSyncError::NoBeds;
            tracing::error!("{err}");
            return Err(err);
        }

        // A fresh memo: every foundation failure of an explicit refresh is shown.
        let summary = self
            .reconciler
            .apply(&snapshot, &mut ErrorMemo::default())
            .await?;
        Ok(SensorOutcome::Refreshed(summary))
    }

    fn remote(&self) -> &R {
        self.reconciler.remote()
    }

    async fn device(&self, device_id: &LocalDeviceId) -> Result<LocalDevice, BedSyncError> {
        self.reconciler
            .store()
            .get_device(device_id)
            .await?
            .ok_or_else(|| {
                NotFoundError {
                    entity: "Device",
                    id: device_id.to_string(),
                }
                .into()
            })
    }

    async fn bound_device(
        &self,
        device_id: &LocalDeviceId,
    ) -> Result<(LocalDevice, BedId), BedSyncError> {
        let device = self.device(device_id).await?;
        let bed_id = device
            .bed_id()
            .ok_or(ValidationError::MissingBedId)
            .inspect_err(log_rejection)?;
        Ok((device, bed_id))
    }

    async fn dispatch<F, Fut>(
        &self,
        device: &LocalDevice,
        command: &BedCommand,
        send: F,
    ) -> Result<(), BedSyncError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), RemoteError>>,
    {
        let description = command.describe(&device.name);
        tracing::info!("sending \"{}\": {description}", device.name);
        send().await.map_err(|err| {
            tracing::error!(%err, "unable to {description}");
            err.into()
        })
    }
}

fn require(
    device: &LocalDevice,
    supported: bool,
    feature: &'static str,
) -> Result<(), BedSyncError> {
    if supported {
        return Ok(());
    }
    let err = UnsupportedFeatureError {
        device: device.name.clone(),
        feature,
    };
    tracing::error!("{err}");
    Err(err.into())
}

fn log_rejection(err: &ValidationError) {
    tracing::error!("{err}; no action taken");
}
