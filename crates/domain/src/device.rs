//! Local device: a host-registry record mirroring one remote bed.
//!
//! A device is bound to a [`Bed`](crate::bed::Bed) through its `bedId`
//! property. Reconciliation overwrites its properties and states wholesale on
//! every successful poll; nothing else about the device is owned here.

pub mod keys;
mod value;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use self::value::AttributeValue;
use crate::error::{BedSyncError, ValidationError};
use crate::id::{BedId, LocalDeviceId};
use crate::time::Timestamp;

/// Configuration properties of a device, keyed by property name.
pub type PropertyMap = BTreeMap<String, AttributeValue>;

/// Observable states of a device, keyed by state name.
pub type StateMap = BTreeMap<String, AttributeValue>;

/// Kind of device the integration knows how to drive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceKind {
    #[default]
    SleepNumberBed,
}

/// A device record held by the host registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalDevice {
    pub id: LocalDeviceId,
    pub name: String,
    pub kind: DeviceKind,
    pub enabled: bool,
    pub configured: bool,
    pub properties: PropertyMap,
    pub states: StateMap,
    pub last_updated: Option<Timestamp>,
}

impl LocalDevice {
    /// Create a builder for constructing a [`LocalDevice`].
    #[must_use]
    pub fn builder() -> LocalDeviceBuilder {
        LocalDeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`BedSyncError::Validation`] when the id is empty or a
    /// SleepNumber bed device has no `bedId`.
    pub fn validate(&self) -> Result<(), BedSyncError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyDeviceId.into());
        }
        if self.kind == DeviceKind::SleepNumberBed && self.bed_id().is_none() {
            return Err(ValidationError::MissingBedId.into());
        }
        Ok(())
    }

    /// The bed this device is bound to, if any.
    #[must_use]
    pub fn bed_id(&self) -> Option<BedId> {
        self.property_str(keys::BED_ID)
            .filter(|value| !value.is_empty())
            .map(BedId::from)
    }

    /// Whether this device mirrors the given bed.
    #[must_use]
    pub fn is_bound_to(&self, bed_id: &BedId) -> bool {
        self.property_str(keys::BED_ID) == Some(bed_id.as_str())
    }

    /// Whether reconciliation should touch this device at all.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled && self.configured && self.kind == DeviceKind::SleepNumberBed
    }

    /// Current `onOffState`; a missing state reads as off.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.states
            .get(keys::ON_OFF_STATE)
            .and_then(AttributeValue::as_bool)
            .unwrap_or(false)
    }

    /// Foundation model recorded on the device, empty when none.
    #[must_use]
    pub fn base(&self) -> &str {
        self.property_str(keys::BASE).unwrap_or_default()
    }

    #[must_use]
    pub fn has_foundation(&self) -> bool {
        !self.base().is_empty()
    }

    #[must_use]
    pub fn has_foot_control(&self) -> bool {
        self.properties
            .get(keys::HAS_FOOT_CONTROL)
            .and_then(AttributeValue::as_bool)
            .unwrap_or(false)
    }

    fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(AttributeValue::as_str)
    }
}

/// Step-by-step builder for [`LocalDevice`].
#[derive(Debug)]
pub struct LocalDeviceBuilder {
    id: Option<LocalDeviceId>,
    name: Option<String>,
    kind: DeviceKind,
    enabled: bool,
    configured: bool,
    properties: PropertyMap,
    states: StateMap,
}

impl Default for LocalDeviceBuilder {
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            kind: DeviceKind::default(),
            enabled: true,
            configured: true,
            properties: PropertyMap::new(),
            states: StateMap::new(),
        }
    }
}

impl LocalDeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<LocalDeviceId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: DeviceKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn configured(mut self, configured: bool) -> Self {
        self.configured = configured;
        self
    }

    /// Bind the device to a bed.
    #[must_use]
    pub fn bed_id(self, bed_id: impl Into<BedId>) -> Self {
        let bed_id = bed_id.into();
        self.property(keys::BED_ID, bed_id.as_str())
    }

    #[must_use]
    pub fn property(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn state(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.states.insert(key.into(), value.into());
        self
    }

    /// Consume the builder, validate, and return a [`LocalDevice`].
    ///
    /// # Errors
    ///
    /// Returns [`BedSyncError::Validation`] if the id is missing or the
    /// device is not bound to a bed.
    pub fn build(self) -> Result<LocalDevice, BedSyncError> {
        let device = LocalDevice {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            kind: self.kind,
            enabled: self.enabled,
            configured: self.configured,
            properties: self.properties,
            states: self.states,
            last_updated: None,
        };
        device.validate()?;
        Ok(device)
    }
}
