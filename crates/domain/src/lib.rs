//! # bedsync-domain
//!
//! Pure domain model for the bedsync smart-bed integration.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error taxonomy, timestamps
//! - Define the **remote account model** (beds, sides, sleepers, foundations)
//!   as it exists for the duration of one poll
//! - Define **local devices** (host records bound to a bed by `bedId`) and
//!   their property/state maps
//! - Define **command values** (sleep number, preset, speed, base position)
//!   with their validation rules
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod account;
pub mod bed;
pub mod command;
pub mod device;
pub mod foundation;
