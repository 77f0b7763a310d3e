//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod account_service;
pub mod command_service;
pub mod error_memo;
pub mod poll_loop;
pub mod reconcile;

#[cfg(test)]
pub(crate) mod fakes;
