//! JSON REST handlers for bed devices.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use bedsync_app::ports::{DeviceStore, RemoteSession};
use bedsync_app::services::command_service::SensorOutcome;
use bedsync_domain::bed::BedSide;
use bedsync_domain::command::SensorAction;
use bedsync_domain::device::LocalDevice;
use bedsync_domain::error::{BedSyncError, NotFoundError};
use bedsync_domain::foundation::Actuator;
use bedsync_domain::id::LocalDeviceId;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for setting the sleep number of one side.
#[derive(Deserialize)]
pub struct SleepNumberRequest {
    pub side: String,
    pub sleep_number: i64,
}

/// Request body for selecting a FlexFit preset.
#[derive(Deserialize)]
pub struct PresetRequest {
    pub side: String,
    pub preset: i64,
    pub speed: i64,
}

/// Request body for moving one actuator.
#[derive(Deserialize)]
pub struct BasePositionRequest {
    pub side: String,
    pub actuator: String,
    pub position: i64,
    pub speed: i64,
}

/// Request body for a generic sensor action.
#[derive(Deserialize)]
pub struct SensorRequest {
    pub action: String,
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<LocalDevice>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the command endpoints.
pub enum CommandResponse {
    /// The command was accepted by the remote service.
    NoContent,
}

impl IntoResponse for CommandResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Body returned by the sensor endpoint.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SensorResponse {
    Ignored,
    Refreshed { beds: usize, devices_updated: usize },
}

impl From<SensorOutcome> for SensorResponse {
    fn from(outcome: SensorOutcome) -> Self {
        match outcome {
            SensorOutcome::Ignored => Self::Ignored,
            SensorOutcome::Refreshed(summary) => Self::Refreshed {
                beds: summary.beds,
                devices_updated: summary.devices_updated,
            },
        }
    }
}

/// `GET /api/devices`
pub async fn list<R, S>(
    State(state): State<AppState<R, S>>,
) -> Result<Json<Vec<LocalDevice>>, ApiError>
where
    R: RemoteSession + 'static,
    S: DeviceStore + 'static,
{
    let devices = state.device_store.list_devices().await?;
    Ok(Json(devices))
}

/// `GET /api/devices/{id}`
pub async fn get<R, S>(
    State(state): State<AppState<R, S>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    R: RemoteSession + 'static,
    S: DeviceStore + 'static,
{
    let device_id = LocalDeviceId::from(id);
    let device = state
        .device_store
        .get_device(&device_id)
        .await?
        .ok_or_else(|| {
            BedSyncError::from(NotFoundError {
                entity: "Device",
                id: device_id.to_string(),
            })
        })?;
    Ok(GetResponse::Ok(Json(device)))
}

/// `POST /api/devices/{id}/sleep-number`
pub async fn set_sleep_number<R, S>(
    State(state): State<AppState<R, S>>,
    Path(id): Path<String>,
    Json(req): Json<SleepNumberRequest>,
) -> Result<CommandResponse, ApiError>
where
    R: RemoteSession + 'static,
    S: DeviceStore + 'static,
{
    let side: BedSide = req.side.parse()?;
    state
        .command_service
        .set_sleep_number(&LocalDeviceId::from(id), side, req.sleep_number)
        .await?;
    Ok(CommandResponse::NoContent)
}

/// `POST /api/devices/{id}/preset`
pub async fn select_preset<R, S>(
    State(state): State<AppState<R, S>>,
    Path(id): Path<String>,
    Json(req): Json<PresetRequest>,
) -> Result<CommandResponse, ApiError>
where
    R: RemoteSession + 'static,
    S: DeviceStore + 'static,
{
    let side: BedSide = req.side.parse()?;
    state
        .command_service
        .select_preset(&LocalDeviceId::from(id), side, req.preset, req.speed)
        .await?;
    Ok(CommandResponse::NoContent)
}

/// `POST /api/devices/{id}/base-position`
pub async fn set_base_position<R, S>(
    State(state): State<AppState<R, S>>,
    Path(id): Path<String>,
    Json(req): Json<BasePositionRequest>,
) -> Result<CommandResponse, ApiError>
where
    R: RemoteSession + 'static,
    S: DeviceStore + 'static,
{
    let side: BedSide = req.side.parse()?;
    let actuator: Actuator = req.actuator.parse()?;
    state
        .command_service
        .set_base_position(
            &LocalDeviceId::from(id),
            side,
            actuator,
            req.position,
            req.speed,
        )
        .await?;
    Ok(CommandResponse::NoContent)
}

/// `POST /api/devices/{id}/sensor`
pub async fn sensor_action<R, S>(
    State(state): State<AppState<R, S>>,
    Path(id): Path<String>,
    Json(req): Json<SensorRequest>,
) -> Result<Json<SensorResponse>, ApiError>
where
    R: RemoteSession + 'static,
    S: DeviceStore + 'static,
{
    let action: SensorAction = req.action.parse()?;
    let outcome = state
        .command_service
        .handle_sensor_action(&LocalDeviceId::from(id), action)
        .await?;
    Ok(Json(outcome.into()))
}
