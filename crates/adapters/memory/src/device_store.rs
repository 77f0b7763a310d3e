//! In-memory implementation of [`DeviceStore`].

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use bedsync_app::ports::DeviceStore;
use bedsync_domain::device::{LocalDevice, PropertyMap, StateMap};
use bedsync_domain::error::{BedSyncError, NotFoundError};
use bedsync_domain::id::LocalDeviceId;
use bedsync_domain::time;

use crate::error::StoreError;

type Devices = Arc<RwLock<BTreeMap<LocalDeviceId, LocalDevice>>>;

/// Device registry held in process memory.
///
/// Cloning shares the underlying records. Writes that leave a device
/// unchanged are dropped, so `last_updated` only moves on real changes.
#[derive(Clone, Default)]
pub struct InMemoryDeviceStore {
    devices: Devices,
}

impl InMemoryDeviceStore {
    /// Build a store holding the given devices.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unbound device and
    /// [`StoreError::DuplicateDevice`] when two devices share an id.
    pub fn seeded(devices: impl IntoIterator<Item = LocalDevice>) -> Result<Self, BedSyncError> {
        let mut map = BTreeMap::new();
        for device in devices {
            device.validate()?;
            if map.contains_key(&device.id) {
                return Err(StoreError::DuplicateDevice(device.id).into());
            }
            map.insert(device.id.clone(), device);
        }
        tracing::debug!(count = map.len(), "device store seeded");
        Ok(Self {
            devices: Arc::new(RwLock::new(map)),
        })
    }

    /// Number of devices held.
    pub async fn len(&self) -> usize {
        self.devices.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.devices.read().await.is_empty()
    }
}

fn not_found(id: &LocalDeviceId) -> BedSyncError {
    NotFoundError {
        entity: "Device",
        id: id.to_string(),
    }
    .into()
}

impl DeviceStore for InMemoryDeviceStore {
    fn list_devices(&self) -> impl Future<Output = Result<Vec<LocalDevice>, BedSyncError>> + Send {
        let devices = Arc::clone(&self.devices);
        async move { Ok(devices.read().await.values().cloned().collect()) }
    }

    fn get_device(
        &self,
        id: &LocalDeviceId,
    ) -> impl Future<Output = Result<Option<LocalDevice>, BedSyncError>> + Send {
        let devices = Arc::clone(&self.devices);
        let id = id.clone();
        async move { Ok(devices.read().await.get(&id).cloned()) }
    }

    fn replace_properties(
        &self,
        id: &LocalDeviceId,
        properties: PropertyMap,
    ) -> impl Future<Output = Result<(), BedSyncError>> + Send {
        let devices = Arc::clone(&self.devices);
        let id = id.clone();
        async move {
            let mut devices = devices.write().await;
            let device = devices.get_mut(&id).ok_or_else(|| not_found(&id))?;
            if device.properties == properties {
                tracing::trace!(device_id = %id, "properties unchanged");
                return Ok(());
            }
            device.properties = properties;
            device.last_updated = Some(time::now());
            tracing::debug!(device_id = %id, "properties replaced");
            Ok(())
        }
    }

    fn update_states(
        &self,
        id: &LocalDeviceId,
        states: StateMap,
    ) -> impl Future<Output = Result<(), BedSyncError>> + Send {
        let devices = Arc::clone(&self.devices);
        let id = id.clone();
        async move {
            let mut devices = devices.write().await;
            let device = devices.get_mut(&id).ok_or_else(|| not_found(&id))?;
            let changed: StateMap = states
                .into_iter()
                .filter(|(key, value)| device.states.get(key) != Some(value))
                .collect();
            if changed.is_empty() {
                tracing::trace!(device_id = %id, "states unchanged");
                return Ok(());
            }
            tracing::debug!(device_id = %id, changed = changed.len(), "states updated");
            device.states.extend(changed);
            device.last_updated = Some(time::now());
            Ok(())
        }
    }
}
