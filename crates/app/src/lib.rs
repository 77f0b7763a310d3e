//! # bedsync-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `RemoteSession`: the authenticated SleepIQ account
//!   - `DeviceStore`: the host registry of local devices
//! - Define **driving/inbound** use-cases:
//!   - `PollLoop`: periodic fetch, re-login and rate-limited error reporting
//!   - `Reconciler`: mirror a snapshot onto bound devices
//!   - `CommandService`: validated bed commands and sensor actions
//!   - `AccountService`: credential checks and bed listing for pairing
//! - Orchestrate domain objects without knowing *how* IO works
//!
//! ## Dependency rule
//! Depends on `bedsync-domain` only (plus `tokio::sync`/`tokio::time`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
