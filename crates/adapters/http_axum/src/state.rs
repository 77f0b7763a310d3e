//! Shared application state for axum handlers.

use std::sync::Arc;

use bedsync_app::ports::{DeviceStore, RemoteSession};
use bedsync_app::services::account_service::AccountService;
use bedsync_app::services::command_service::CommandService;

/// Application state shared across all axum handlers.
///
/// Generic over the remote session and the device store to avoid dynamic
/// dispatch. `Clone` is implemented manually so the underlying types do not
/// need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<R, S> {
    /// Bed commands and sensor actions.
    pub command_service: Arc<CommandService<R, S>>,
    /// Credential check and bed list.
    pub account_service: Arc<AccountService<R>>,
    /// Device registry, read directly for listings.
    pub device_store: Arc<S>,
}

impl<R, S> Clone for AppState<R, S> {
    fn clone(&self) -> Self {
        Self {
            command_service: Arc::clone(&self.command_service),
            account_service: Arc::clone(&self.account_service),
            device_store: Arc::clone(&self.device_store),
        }
    }
}

impl<R, S> AppState<R, S>
where
    R: RemoteSession + 'static,
    S: DeviceStore + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        command_service: CommandService<R, S>,
        account_service: AccountService<R>,
        device_store: S,
    ) -> Self {
        Self {
            command_service: Arc::new(command_service),
            account_service: Arc::new(account_service),
            device_store: Arc::new(device_store),
        }
    }
}
