//! JSON REST handler for the account's bed list.

use axum::Json;
use axum::extract::State;

use bedsync_app::ports::{DeviceStore, RemoteSession};
use bedsync_domain::account::BedChoice;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/beds`
pub async fn list<R, S>(
    State(state): State<AppState<R, S>>,
) -> Result<Json<Vec<BedChoice>>, ApiError>
where
    R: RemoteSession + 'static,
    S: DeviceStore + 'static,
{
    let beds = state.account_service.list_beds().await?;
    Ok(Json(beds))
}
