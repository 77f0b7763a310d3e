//! # bedsync-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Expose the bed devices held by the host store (`/api/devices`)
//! - Map host actions (sleep number, preset, base position, sensor actions)
//!   into [`CommandService`](bedsync_app::services::command_service::CommandService) calls
//! - Serve the bed list and the credential check used while pairing
//!
//! ## Dependency rule
//! Depends on `bedsync-app` (for port traits and services) and `bedsync-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
