//! Reconciliation: mirror a fetched snapshot onto the bound local devices.
//!
//! Planning is pure: [`plan_updates`] turns one bed (plus its foundation data)
//! into the full property and state sets for every device bound to it.
//! [`Reconciler`] does the IO around it: foundation fetches, device listing and
//! the two store writes per device.

use bedsync_domain::bed::{Bed, BedSide};
use bedsync_domain::device::{AttributeValue, LocalDevice, PropertyMap, StateMap, keys};
use bedsync_domain::error::BedSyncError;
use bedsync_domain::foundation::{Actuator, FoundationFeatures, FoundationStatus};
use bedsync_domain::id::LocalDeviceId;

use super::error_memo::ErrorMemo;
use crate::ports::{DeviceStore, RemoteSession};

/// Foundation data fetched for one bed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoundationSnapshot {
    pub status: FoundationStatus,
    pub features: FoundationFeatures,
}

/// Everything to write onto one device for one bed.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceUpdate {
    pub device_id: LocalDeviceId,
    pub device_name: String,
    pub properties: PropertyMap,
    pub states: StateMap,
    /// New `onOffState` when it differs from the device's current one.
    pub transition: Option<bool>,
}

/// Plan the writes for every active device bound to `bed`.
///
/// Devices bound to another bed (or inactive ones) get no update at all.
/// Foundation properties and position states are only produced when the bed
/// has a base; otherwise any previously written foundation properties are
/// carried over as they were.
#[must_use]
pub fn plan_updates(
    bed: &Bed,
    foundation: &FoundationSnapshot,
    devices: &[LocalDevice],
) -> Vec<DeviceUpdate> {
    let states = bed_states(bed, foundation);
    let on = bed.anyone_in_bed();

    devices
        .iter()
        .filter(|device| device.is_active() && device.is_bound_to(&bed.bed_id))
        .map(|device| DeviceUpdate {
            device_id: device.id.clone(),
            device_name: device.name.clone(),
            properties: bed_properties(device.properties.clone(), bed, foundation),
            states: states.clone(),
            transition: (device.is_on() != on).then_some(on),
        })
        .collect()
}

fn bed_properties(
    mut properties: PropertyMap,
    bed: &Bed,
    foundation: &FoundationSnapshot,
) -> PropertyMap {
    let mut set = |key: &str, value: AttributeValue| {
        properties.insert(key.to_string(), value);
    };

    set(keys::ACCOUNT_ID, bed.account_id.as_str().into());
    set(keys::ADDRESS, bed.bed_id.as_str().into());
    set(keys::BASE, bed.base.as_str().into());
    set(keys::BED_NAME, bed.name.as_str().into());
    set(keys::DUAL_SLEEP, bed.dual_sleep.into());
    set(keys::GENERATION, bed.generation.as_str().into());
    set(keys::IS_KIDS_BED, bed.is_kids_bed.into());
    set(keys::MAC_ADDRESS, bed.mac_address.as_str().into());
    set(keys::MODEL, bed.model.as_str().into());
    set(keys::PURCHASE_DATE, bed.purchase_date.as_str().into());
    set(keys::REFERENCE, bed.reference.as_str().into());
    set(keys::REGISTRATION_DATE, bed.registration_date.as_str().into());
    set(keys::RETURN_REQUEST_STATUS, bed.return_request_status.into());
    set(keys::SERIAL, bed.serial.as_str().into());
    set(keys::SIZE, bed.size.as_str().into());
    set(keys::SKU, bed.sku.as_str().into());
    set(keys::STATUS, bed.status.into());
    set(keys::TIME_ZONE, bed.timezone.as_str().into());
    set(keys::VERSION, bed.version.as_str().into());
    set(keys::ZIP_CODE, bed.zipcode.as_str().into());

    if bed.has_foundation() {
        let status = &foundation.status;
        let features = &foundation.features;
        set(keys::BASE_CONFIGURED, status.configured.into());
        set(keys::BASE_NEEDS_HOMING, status.needs_homing.into());
        set(keys::BASE_TYPE, status.foundation_type.as_str().into());
        set(keys::HAS_FOOT_CONTROL, features.has_foot_control.into());
        set(keys::HAS_FOOT_WARMING, features.has_foot_warming.into());
        set(
            keys::HAS_MASSAGE_AND_LIGHT,
            features.has_massage_and_light.into(),
        );
        set(keys::HAS_UNDERBED_LIGHT, features.has_underbed_light.into());
    }

    properties
}

fn bed_states(bed: &Bed, foundation: &FoundationSnapshot) -> StateMap {
    let mut states = StateMap::new();

    for side in BedSide::ALL {
        let status = bed.side(side);
        let sleeper = status.sleeper.clone().unwrap_or_default();
        let mut set = |suffix: &str, value: AttributeValue| {
            states.insert(keys::side_state(side, suffix), value);
        };

        set(keys::IS_IN_BED, status.is_in_bed.into());
        set(keys::PRESSURE, status.pressure.into());
        set(keys::SLEEP_NUMBER, status.sleep_number.into());
        set(keys::SLEEPER_ID, sleeper.sleeper_id.as_str().into());
        set(keys::SLEEPER_NAME, sleeper.first_name.into());
        set(keys::SLEEP_GOAL, sleeper.sleep_goal.into());
        set(keys::ALERT_ID, status.alert_id.as_str().into());
        set(keys::ALERT_TEXT, status.alert_text.as_str().into());

        if bed.has_foundation() {
            set(
                keys::HEAD_POSITION,
                decoded_position(bed, &foundation.status, side, Actuator::Head).into(),
            );
            set(
                keys::FOOT_POSITION,
                decoded_position(bed, &foundation.status, side, Actuator::Foot).into(),
            );
        }
    }

    let anyone = bed.anyone_in_bed();
    states.insert(keys::ANYONE_IN_BED.to_string(), anyone.into());
    states.insert(
        keys::EVERYONE_IN_BED.to_string(),
        bed.everyone_in_bed().into(),
    );
    states.insert(keys::ON_OFF_STATE.to_string(), anyone.into());

    states
}

fn decoded_position(
    bed: &Bed,
    status: &FoundationStatus,
    side: BedSide,
    actuator: Actuator,
) -> i64 {
    status.position(side, actuator).unwrap_or_else(|err| {
        tracing::warn!(
            bed = bed.display_name(),
            side = side.label(),
            actuator = actuator.label(),
            %err,
            "falling back to a flat position"
        );
        0
    })
}

/// Result of applying one snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub beds: usize,
    pub devices_updated: usize,
}

/// Applies snapshots to the device store.
pub struct Reconciler<R, S> {
    remote: R,
    store: S,
}

impl<R: RemoteSession, S: DeviceStore> Reconciler<R, S> {
    /// Create a new reconciler backed by the given ports.
    pub fn new(remote: R, store: S) -> Self {
        Self { remote, store }
    }

    #[must_use]
    pub fn remote(&self) -> &R {
        &self.remote
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mirror every bed of `snapshot` onto its bound devices, in order.
    ///
    /// Foundation fetch failures are reported through `memo` and replaced by
    /// defaults. A bed listed twice is written twice, so the later one wins.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the device store.
    #[tracing::instrument(skip_all, fields(beds = snapshot.len()))]
    pub async fn apply(
        &self,
        snapshot: &[Bed],
        memo: &mut ErrorMemo,
    ) -> Result<ReconcileSummary, BedSyncError> {
        let mut summary = ReconcileSummary::default();

        for bed in snapshot {
            let foundation = if bed.has_foundation() {
                self.fetch_foundation(bed, memo).await
            } else {
                FoundationSnapshot::default()
            };

            let devices = self.store.list_devices().await?;
            for update in plan_updates(bed, &foundation, &devices) {
                self.write(update).await?;
                summary.devices_updated += 1;
            }
            summary.beds += 1;
        }

        Ok(summary)
    }

    async fn fetch_foundation(&self, bed: &Bed, memo: &mut ErrorMemo) -> FoundationSnapshot {
        let status = self
            .remote
            .foundation_status(&bed.bed_id)
            .await
            .unwrap_or_else(|err| {
                memo.report(foundation_error("status", bed, &err));
                FoundationStatus::default()
            });
        let features = self
            .remote
            .foundation_features(&bed.bed_id)
            .await
            .unwrap_or_else(|err| {
                memo.report(foundation_error("features list", bed, &err));
                FoundationFeatures::default()
            });
        FoundationSnapshot { status, features }
    }

    async fn write(&self, update: DeviceUpdate) -> Result<(), BedSyncError> {
        if let Some(on) = update.transition {
            tracing::info!(
                "received \"{}\" status update is {}",
                update.device_name,
                if on { "on" } else { "off" }
            );
        }
        tracing::debug!(device = %update.device_name, properties = ?update.properties, "setting device properties");
        self.store
            .replace_properties(&update.device_id, update.properties)
            .await?;
        tracing::debug!(device = %update.device_name, states = ?update.states, "setting device states");
        self.store
            .update_states(&update.device_id, update.states)
            .await
    }
}

fn foundation_error(what: &str, bed: &Bed, err: &impl std::fmt::Display) -> String {
    format!(
        "Unable to obtain {what} information for the base of the \"{}\" bed. This may be temporary. Check the bed's network connection and this server connection if the error continues. The error was: {err}",
        bed.display_name()
    )
}
