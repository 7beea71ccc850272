//! Driver registry handlers

use crate::api::rest::extract::{enum_filter, required, ApiJson, ApiQuery};
use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use crate::storage::{DriverFilter, DriverStorage};
use axum::{extract::State, http::StatusCode, Json};
use rideshift_types::{DriverAction, DriverPatch, DriverProfile};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverQuery {
    pub user_id: Option<String>,
    /// Verification status
    pub status: Option<String>,
}

pub async fn list_drivers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DriverQuery>,
) -> ApiResult<Json<Vec<DriverProfile>>> {
    let Some(status) = enum_filter(query.status.as_deref()) else {
        return Ok(Json(Vec::new()));
    };
    let filter = DriverFilter {
        user_id: query.user_id.filter(|s| !s.is_empty()),
        status,
    };
    Ok(Json(state.storage.list_drivers(&filter).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDriverRequest {
    pub user_id: Option<String>,
    pub vehicle_details: Option<String>,
    pub license_number: Option<String>,
}

/// Register a driver profile, pending verification
pub async fn create_driver(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateDriverRequest>,
) -> ApiResult<(StatusCode, Json<DriverProfile>)> {
    let user_id = required(request.user_id, "userId")?;
    let vehicle = required(request.vehicle_details, "vehicleDetails")?;
    let license = required(request.license_number, "licenseNumber")?;

    let driver = state
        .storage
        .insert_driver(DriverProfile::new(user_id, vehicle, license))
        .await?;

    tracing::info!(user_id = %driver.user_id, "Driver profile created");

    Ok((StatusCode::CREATED, Json(driver)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateDriverRequest {
    pub user_id: Option<String>,
    pub vehicle_details: Option<String>,
    pub license_number: Option<String>,
}

pub async fn update_driver(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateDriverRequest>,
) -> ApiResult<Json<DriverProfile>> {
    let user_id = required(request.user_id, "userId")?;
    let patch = DriverPatch {
        vehicle_details: request.vehicle_details,
        license_number: request.license_number,
    };

    let driver = state.storage.update_driver(&user_id, patch).await?;

    tracing::info!(user_id = %user_id, "Updated driver profile");

    Ok(Json(driver))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverActionRequest {
    pub user_id: Option<String>,
    pub action: Option<String>,
}

/// Run a verification action (`verify`, `reject`, `activate`, `deactivate`)
pub async fn driver_action(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DriverActionRequest>,
) -> ApiResult<Json<DriverProfile>> {
    let user_id = required(request.user_id, "userId")?;
    let name = required(request.action, "action")?;
    let action: DriverAction = name.parse()?;

    let driver = state.storage.apply_driver_action(&user_id, action).await?;

    tracing::info!(
        user_id = %user_id,
        action = %name,
        verification = %driver.verification_status,
        active = driver.active_status,
        "Driver profile updated"
    );

    Ok(Json(driver))
}
