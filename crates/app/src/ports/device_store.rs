//! Device store port: the host registry that owns local devices.

use std::future::Future;

use bedsync_domain::device::{LocalDevice, PropertyMap, StateMap};
use bedsync_domain::error::BedSyncError;
use bedsync_domain::id::LocalDeviceId;

/// Registry of local devices.
///
/// Each write is atomic on its own; callers write properties before states.
pub trait DeviceStore: Send + Sync {
    /// All devices known to the host, in a stable order.
    fn list_devices(&self) -> impl Future<Output = Result<Vec<LocalDevice>, BedSyncError>> + Send;

    fn get_device(
        &self,
        id: &LocalDeviceId,
    ) -> impl Future<Output = Result<Option<LocalDevice>, BedSyncError>> + Send;

    /// Replace the device's whole property map.
    fn replace_properties(
        &self,
        id: &LocalDeviceId,
        properties: PropertyMap,
    ) -> impl Future<Output = Result<(), BedSyncError>> + Send;

    /// Merge the given states into the device's state map.
    fn update_states(
        &self,
        id: &LocalDeviceId,
        states: StateMap,
    ) -> impl Future<Output = Result<(), BedSyncError>> + Send;
}
