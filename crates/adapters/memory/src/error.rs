//! Store-specific error type.

use bedsync_domain::error::BedSyncError;
use bedsync_domain::id::LocalDeviceId;

/// Errors originating from the in-memory device store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Two seeded devices share the same id.
    #[error("device {0} is defined more than once")]
    DuplicateDevice(LocalDeviceId),
}

impl From<StoreError> for BedSyncError {
    fn from(err: StoreError) -> Self {
        Self::Storage(Box::new(err))
    }
}
