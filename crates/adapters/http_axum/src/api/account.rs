//! JSON REST handler for the credential check.

use axum::Json;
use axum::extract::State;

use bedsync_app::ports::{DeviceStore, RemoteSession};
use bedsync_domain::account::{AccountStatus, Credentials};

use crate::error::ApiError;
use crate::state::AppState;

/// `POST /api/account/verify`
///
/// Checks the submitted username and password without disturbing the
/// daemon's own session. A rejected or unreachable account is a successful
/// check; only blank credentials fail the request.
pub async fn verify<R, S>(
    State(state): State<AppState<R, S>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<AccountStatus>, ApiError>
where
    R: RemoteSession + 'static,
    S: DeviceStore + 'static,
{
    let status = state.account_service.verify(&credentials).await?;
    Ok(Json(status))
}
