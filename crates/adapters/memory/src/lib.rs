//! # bedsync-adapter-memory
//!
//! In-memory implementation of the `DeviceStore` port.
//!
//! ## Responsibilities
//! - Hold the local device records the host registry would own
//! - Seed them from configuration at startup
//! - Skip writes that would not change anything
//!
//! ## Dependency rule
//! Depends on `bedsync-app` (for port traits) and `bedsync-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod device_store;
mod error;

pub use device_store::InMemoryDeviceStore;
pub use error::StoreError;
