//! JSON REST handlers for accessories and their characteristics.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use acbridge_app::controller::AccessoryController;
use acbridge_app::ports::{DeviceCloud, EventPublisher};
use acbridge_domain::accessory::AccessoryInformation;
use acbridge_domain::characteristic::{Characteristic, CharacteristicValue};
use acbridge_domain::error::{BridgeError, StatusUnavailableError};
use acbridge_domain::id::{AccessoryId, DeviceId};
use acbridge_domain::status::StatusRecord;

use crate::error::ApiError;
use crate::state::AppState;

/// An accessory as listed by the API.
#[derive(Debug, Serialize)]
pub struct AccessorySummary {
    pub device_id: DeviceId,
    pub accessory_id: AccessoryId,
    pub display_name: String,
    pub information: AccessoryInformation,
    pub characteristics: Vec<Characteristic>,
    /// Whether the cached status is missing or older than two poll intervals.
    pub stale: bool,
}

/// An accessory with its current characteristic values.
#[derive(Debug, Serialize)]
pub struct AccessoryDetail {
    #[serde(flatten)]
    pub summary: AccessorySummary,
    /// Readable values; characteristics without a cached value are omitted.
    pub values: BTreeMap<&'static str, CharacteristicValue>,
}

/// Body of a characteristic write.
#[derive(Debug, Deserialize)]
pub struct WriteCharacteristicRequest {
    pub value: CharacteristicValue,
}

/// A single characteristic value.
#[derive(Debug, Serialize)]
pub struct CharacteristicResponse {
    pub characteristic: Characteristic,
    pub value: CharacteristicValue,
}

fn summary<C, P>(controller: &AccessoryController<C, P>) -> AccessorySummary
where
    C: DeviceCloud + Send + Sync,
    P: EventPublisher + Send + Sync,
{
    let accessory = controller.accessory();
    AccessorySummary {
        device_id: controller.device_id().clone(),
        accessory_id: accessory.id,
        display_name: accessory.display_name.clone(),
        information: accessory.information.clone(),
        characteristics: controller.characteristics(),
        stale: controller.is_stale(),
    }
}

fn find_controller<C, P>(
    state: &AppState<C, P>,
    device_id: String,
) -> Result<Arc<AccessoryController<C, P>>, ApiError> {
    let device_id = DeviceId::new(device_id)?;
    Ok(Arc::clone(state.registry.get(&device_id)?))
}

/// `GET /api/accessories`
pub async fn list<C, P>(State(state): State<AppState<C, P>>) -> Json<Vec<AccessorySummary>>
where
    C: DeviceCloud + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    Json(state.registry.iter().map(|c| summary(c)).collect())
}

/// `GET /api/accessories/{device_id}`
pub async fn get<C, P>(
    State(state): State<AppState<C, P>>,
    Path(device_id): Path<String>,
) -> Result<Json<AccessoryDetail>, ApiError>
where
    C: DeviceCloud + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    let controller = find_controller(&state, device_id)?;
    let values = controller
        .characteristics()
        .into_iter()
        .filter_map(|ch| controller.get(ch).ok().map(|value| (ch.as_str(), value)))
        .collect();
    Ok(Json(AccessoryDetail {
        summary: summary(&controller),
        values,
    }))
}

/// `GET /api/accessories/{device_id}/status`
pub async fn status<C, P>(
    State(state): State<AppState<C, P>>,
    Path(device_id): Path<String>,
) -> Result<Json<StatusRecord>, ApiError>
where
    C: DeviceCloud + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    let controller = find_controller(&state, device_id)?;
    let record = controller
        .status()
        .ok_or_else(|| BridgeError::from(StatusUnavailableError::NotYetFetched))?;
    Ok(Json(record))
}

/// `POST /api/accessories/{device_id}/refresh`
pub async fn refresh<C, P>(
    State(state): State<AppState<C, P>>,
    Path(device_id): Path<String>,
) -> Result<Json<StatusRecord>, ApiError>
where
    C: DeviceCloud + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    let controller = find_controller(&state, device_id)?;
    let record = controller.refresh().await?;
    Ok(Json(record))
}

/// `GET /api/accessories/{device_id}/characteristics/{name}`
pub async fn read_characteristic<C, P>(
    State(state): State<AppState<C, P>>,
    Path((device_id, name)): Path<(String, String)>,
) -> Result<Json<CharacteristicResponse>, ApiError>
where
    C: DeviceCloud + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    let controller = find_controller(&state, device_id)?;
    let characteristic: Characteristic = name.parse()?;
    let value = controller.get(characteristic)?;
    Ok(Json(CharacteristicResponse {
        characteristic,
        value,
    }))
}

/// `PUT /api/accessories/{device_id}/characteristics/{name}`
pub async fn write_characteristic<C, P>(
    State(state): State<AppState<C, P>>,
    Path((device_id, name)): Path<(String, String)>,
    Json(request): Json<WriteCharacteristicRequest>,
) -> Result<Json<CharacteristicResponse>, ApiError>
where
    C: DeviceCloud + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    let controller = find_controller(&state, device_id)?;
    let characteristic: Characteristic = name.parse()?;
    controller.set(characteristic, request.value).await?;
    Ok(Json(CharacteristicResponse {
        characteristic,
        value: request.value,
    }))
}
