//! Ride registry handlers

use crate::api::rest::extract::{enum_filter, required, ApiJson, ApiQuery};
use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use crate::storage::{RideFilter, RideStorage};
use axum::{extract::State, http::StatusCode, Json};
use rideshift_types::{validate_commission_rate, Ride, RideAction, RideId, RidePatch};
use serde::Deserialize;

/// Ride list filters
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideQuery {
    pub status: Option<String>,
    pub requester_id: Option<String>,
    pub driver_id: Option<String>,
}

/// List rides matching the query
pub async fn list_rides(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RideQuery>,
) -> ApiResult<Json<Vec<Ride>>> {
    let Some(status) = enum_filter(query.status.as_deref()) else {
        return Ok(Json(Vec::new()));
    };
    let filter = RideFilter {
        status,
        requester_id: query.requester_id.filter(|s| !s.is_empty()),
        driver_id: query.driver_id.filter(|s| !s.is_empty()),
    };
    let rides = state.storage.list_rides(&filter).await?;
    Ok(Json(rides))
}

/// Create ride request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRideRequest {
    pub requester_id: Option<String>,
    pub pickup_location: Option<String>,
    pub dropoff_location: Option<String>,
    pub commission_rate: Option<f64>,
}

/// Request a new ride, priced against the configured mock trip
pub async fn create_ride(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateRideRequest>,
) -> ApiResult<(StatusCode, Json<Ride>)> {
    let requester_id = required(request.requester_id, "requesterId")?;
    let pickup = required(request.pickup_location, "pickupLocation")?;
    let dropoff = required(request.dropoff_location, "dropoffLocation")?;

    let commission_rate = match request.commission_rate {
        Some(rate) => validate_commission_rate(rate)?,
        None => state.fare.default_commission_rate,
    };
    let fare = state.fare.estimate(commission_rate);

    let ride = Ride::request(requester_id, pickup, dropoff, fare, commission_rate);
    let ride = state.storage.insert_ride(ride).await?;

    tracing::info!(
        ride_id = %ride.ride_id,
        requester_id = %ride.requester_id,
        fare = ride.fare_amount,
        "Ride requested"
    );

    Ok((StatusCode::CREATED, Json(ride)))
}

/// Update ride request; only the locations are editable
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateRideRequest {
    pub ride_id: Option<String>,
    pub pickup_location: Option<String>,
    pub dropoff_location: Option<String>,
}

/// Edit a ride's pickup or dropoff
pub async fn update_ride(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateRideRequest>,
) -> ApiResult<Json<Ride>> {
    let ride_id = RideId::new(required(request.ride_id, "rideId")?);
    let patch = RidePatch {
        pickup_location: request.pickup_location,
        dropoff_location: request.dropoff_location,
    };

    let ride = state.storage.update_ride(&ride_id, patch).await?;

    tracing::info!(ride_id = %ride_id, "Updated ride");

    Ok(Json(ride))
}

/// Ride action request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideActionRequest {
    pub ride_id: Option<String>,
    pub driver_id: Option<String>,
    pub action: Option<String>,
}

/// Run a lifecycle action (`accept`, `start`, `complete`, `cancel`)
pub async fn ride_action(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RideActionRequest>,
) -> ApiResult<Json<Ride>> {
    let ride_id = RideId::new(required(request.ride_id, "rideId")?);
    let name = required(request.action, "action")?;
    let action = RideAction::parse(&name, request.driver_id)?;

    let ride = state.storage.transition_ride(&ride_id, action).await?;

    tracing::info!(
        ride_id = %ride_id,
        action = %name,
        status = %ride.status,
        "Ride transitioned"
    );

    Ok(Json(ride))
}
