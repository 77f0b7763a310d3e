//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod account;
#[allow(clippy::missing_errors_doc)]
pub mod beds;
#[allow(clippy::missing_errors_doc)]
pub mod devices;

use axum::Router;
use axum::routing::{get, post};

use bedsync_app::ports::{DeviceStore, RemoteSession};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<R, S>() -> Router<AppState<R, S>>
where
    R: RemoteSession + 'static,
    S: DeviceStore + 'static,
{
    Router::new()
        // Devices
        .route("/devices", get(devices::list::<R, S>))
        .route("/devices/{id}", get(devices::get::<R, S>))
        .route(
            "/devices/{id}/sleep-number",
            post(devices::set_sleep_number::<R, S>),
        )
        .route("/devices/{id}/preset", post(devices::select_preset::<R, S>))
        .route(
            "/devices/{id}/base-position",
            post(devices::set_base_position::<R, S>),
        )
        .route("/devices/{id}/sensor", post(devices::sensor_action::<R, S>))
        // Account
        .route("/beds", get(beds::list::<R, S>))
        .route("/account/verify", post(account::verify::<R, S>))
}
