//! # bedsync-adapter-sleepiq
//!
//! Remote session adapter for the SleepIQ cloud API using
//! [reqwest](https://docs.rs/reqwest).
//!
//! ## Responsibilities
//! - Implement the `RemoteSession` port defined in `bedsync-app::ports::remote`
//! - Hold the session key obtained at login and attach it to every request
//! - Merge the bed, family status and sleeper endpoints into domain beds
//! - Map HTTP 401 to an authentication failure so callers can log in again
//!
//! ## Dependency rule
//! Depends on `bedsync-app` (for port traits) and `bedsync-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod client;
pub mod config;
pub mod error;
mod wire;

pub use client::SleepIqClient;
pub use config::SleepIqConfig;
pub use error::SleepIqError;
