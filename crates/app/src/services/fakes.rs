//! In-memory port implementations shared by the service tests.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use bedsync_domain::account::Credentials;
use bedsync_domain::bed::{Bed, BedSide, Snapshot};
use bedsync_domain::command::SleepNumber;
use bedsync_domain::device::{LocalDevice, PropertyMap, StateMap};
use bedsync_domain::error::{BedSyncError, NotFoundError, RemoteError};
use bedsync_domain::foundation::{
    Actuator, BasePosition, FoundationFeatures, FoundationStatus, Preset, Speed,
};
use bedsync_domain::id::{BedId, LocalDeviceId};

use crate::ports::{DeviceStore, RemoteSession};

/// A command the fake remote received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RemoteCall {
    SleepNumber {
        bed_id: BedId,
        side: BedSide,
        value: u8,
    },
    Preset {
        bed_id: BedId,
        side: BedSide,
        preset: Preset,
        speed: Speed,
    },
    Position {
        bed_id: BedId,
        side: BedSide,
        actuator: Actuator,
        position: u8,
        speed: Speed,
    },
}

struct RemoteState {
    fetch: Result<Snapshot, RemoteError>,
    login: Result<(), RemoteError>,
    check: Result<(), RemoteError>,
    status: Result<FoundationStatus, RemoteError>,
    features: Result<FoundationFeatures, RemoteError>,
    command: Result<(), RemoteError>,
    fetch_calls: usize,
    login_calls: usize,
    checked: Vec<String>,
    foundation_calls: usize,
    commands: Vec<RemoteCall>,
}

#[derive(Clone)]
pub(crate) struct FakeRemote {
    state: Arc<Mutex<RemoteState>>,
}

impl Default for FakeRemote {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(RemoteState {
                fetch: Ok(Vec::new()),
                login: Ok(()),
                check: Ok(()),
                status: Ok(FoundationStatus::default()),
                features: Ok(FoundationFeatures::default()),
                command: Ok(()),
                fetch_calls: 0,
                login_calls: 0,
                checked: Vec::new(),
                foundation_calls: 0,
                commands: Vec::new(),
            })),
        }
    }
}

impl FakeRemote {
    pub(crate) fn with_beds(beds: Vec<Bed>) -> Self {
        let remote = Self::default();
        remote.set_fetch(Ok(beds));
        remote
    }

    pub(crate) fn set_fetch(&self, result: Result<Snapshot, RemoteError>) {
        self.state.lock().unwrap().fetch = result;
    }

    pub(crate) fn set_login(&self, result: Result<(), RemoteError>) {
        self.state.lock().unwrap().login = result;
    }

    pub(crate) fn set_check(&self, result: Result<(), RemoteError>) {
        self.state.lock().unwrap().check = result;
    }

    pub(crate) fn set_status(&self, result: Result<FoundationStatus, RemoteError>) {
        self.state.lock().unwrap().status = result;
    }

    pub(crate) fn set_features(&self, result: Result<FoundationFeatures, RemoteError>) {
        self.state.lock().unwrap().features = result;
    }

    pub(crate) fn set_command(&self, result: Result<(), RemoteError>) {
        self.state.lock().unwrap().command = result;
    }

    pub(crate) fn fetch_calls(&self) -> usize {
        self.state.lock().unwrap().fetch_calls
    }

    pub(crate) fn login_calls(&self) -> usize {
        self.state.lock().unwrap().login_calls
    }

    /// Usernames passed to `check_credentials`, in order.
    pub(crate) fn checked(&self) -> Vec<String> {
        self.state.lock().unwrap().checked.clone()
    }

    pub(crate) fn foundation_calls(&self) -> usize {
        self.state.lock().unwrap().foundation_calls
    }

    pub(crate) fn commands(&self) -> Vec<RemoteCall> {
        self.state.lock().unwrap().commands.clone()
    }

    fn record(&self, call: RemoteCall) -> Result<(), RemoteError> {
        let mut state = self.state.lock().unwrap();
        state.commands.push(call);
        state.command.clone()
    }
}

impl RemoteSession for FakeRemote {
    fn login(&self) -> impl Future<Output = Result<(), RemoteError>> + Send {
        let mut state = self.state.lock().unwrap();
        state.login_calls += 1;
        let result = state.login.clone();
        async move { result }
    }

    fn check_credentials(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send {
        let mut state = self.state.lock().unwrap();
        state.checked.push(credentials.username.clone());
        let result = state.check.clone();
        async move { result }
    }

    fn beds_with_sleeper_status(
        &self,
    ) -> impl Future<Output = Result<Snapshot, RemoteError>> + Send {
        let mut state = self.state.lock().unwrap();
        state.fetch_calls += 1;
        let result = state.fetch.clone();
        async move { result }
    }

    fn foundation_status(
        &self,
        _bed_id: &BedId,
    ) -> impl Future<Output = Result<FoundationStatus, RemoteError>> + Send {
        let mut state = self.state.lock().unwrap();
        state.foundation_calls += 1;
        let result = state.status.clone();
        async move { result }
    }

    fn foundation_features(
        &self,
        _bed_id: &BedId,
    ) -> impl Future<Output = Result<FoundationFeatures, RemoteError>> + Send {
        let mut state = self.state.lock().unwrap();
        state.foundation_calls += 1;
        let result = state.features.clone();
        async move { result }
    }

    fn set_sleep_number(
        &self,
        bed_id: &BedId,
        side: BedSide,
        sleep_number: SleepNumber,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send {
        let result = self.record(RemoteCall::SleepNumber {
            bed_id: bed_id.clone(),
            side,
            value: sleep_number.value(),
        });
        async move { result }
    }

    fn set_preset(
        &self,
        bed_id: &BedId,
        side: BedSide,
        preset: Preset,
        speed: Speed,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send {
        let result = self.record(RemoteCall::Preset {
            bed_id: bed_id.clone(),
            side,
            preset,
            speed,
        });
        async move { result }
    }

    fn set_foundation_position(
        &self,
        bed_id: &BedId,
        side: BedSide,
        actuator: Actuator,
        position: BasePosition,
        speed: Speed,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send {
        let result = self.record(RemoteCall::Position {
            bed_id: bed_id.clone(),
            side,
            actuator,
            position: position.value(),
            speed,
        });
        async move { result }
    }
}

/// Which store operation ran, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreWrite {
    Properties(LocalDeviceId),
    States(LocalDeviceId),
}

#[derive(Clone, Default)]
pub(crate) struct FakeStore {
    devices: Arc<Mutex<BTreeMap<LocalDeviceId, LocalDevice>>>,
    writes: Arc<Mutex<Vec<StoreWrite>>>,
}

impl FakeStore {
    pub(crate) fn with_devices(devices: impl IntoIterator<Item = LocalDevice>) -> Self {
        let store = Self::default();
        {
            let mut map = store.devices.lock().unwrap();
            for device in devices {
                map.insert(device.id.clone(), device);
            }
        }
        store
    }

    pub(crate) fn device(&self, id: &str) -> LocalDevice {
        self.devices.lock().unwrap()[&LocalDeviceId::new(id)].clone()
    }

    pub(crate) fn writes(&self) -> Vec<StoreWrite> {
        self.writes.lock().unwrap().clone()
    }

    fn missing(id: &LocalDeviceId) -> BedSyncError {
        NotFoundError {
            entity: "Device",
            id: id.to_string(),
        }
        .into()
    }
}

impl DeviceStore for FakeStore {
    fn list_devices(&self) -> impl Future<Output = Result<Vec<LocalDevice>, BedSyncError>> + Send {
        let devices = self.devices.lock().unwrap().values().cloned().collect();
        async { Ok(devices) }
    }

    fn get_device(
        &self,
        id: &LocalDeviceId,
    ) -> impl Future<Output = Result<Option<LocalDevice>, BedSyncError>> + Send {
        let device = self.devices.lock().unwrap().get(id).cloned();
        async { Ok(device) }
    }

    fn replace_properties(
        &self,
        id: &LocalDeviceId,
        properties: PropertyMap,
    ) -> impl Future<Output = Result<(), BedSyncError>> + Send {
        let result = match self.devices.lock().unwrap().get_mut(id) {
            Some(device) => {
                device.properties = properties;
                self.writes
                    .lock()
                    .unwrap()
                    .push(StoreWrite::Properties(id.clone()));
                Ok(())
            }
            None => Err(Self::missing(id)),
        };
        async { result }
    }

    fn update_states(
        &self,
        id: &LocalDeviceId,
        states: StateMap,
    ) -> impl Future<Output = Result<(), BedSyncError>> + Send {
        let result = match self.devices.lock().unwrap().get_mut(id) {
            Some(device) => {
                device.states.extend(states);
                self.writes
                    .lock()
                    .unwrap()
                    .push(StoreWrite::States(id.clone()));
                Ok(())
            }
            None => Err(Self::missing(id)),
        };
        async { result }
    }
}
