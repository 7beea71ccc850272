//! Geocoding, routing and nearby-driver handlers

use crate::api::rest::extract::{required, ApiJson, ApiQuery};
use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{extract::State, response::IntoResponse, response::Response, Json};
use futures::future::try_join_all;
use rideshift_types::{estimate_travel_minutes, haversine_km, Coordinates, NearbyDriver};
use serde::{Deserialize, Serialize};

const DEFAULT_RADIUS_KM: f64 = 5.0;

#[derive(Debug, Default, Deserialize)]
pub struct MapsQuery {
    pub action: Option<String>,
    pub address: Option<String>,
    pub pickup: Option<String>,
    pub destination: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct Geocoded {
    pub address: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Serialize)]
pub struct RouteSummary {
    /// Kilometres
    pub distance: f64,
    /// Minutes
    pub duration: u32,
    pub waypoints: Vec<Coordinates>,
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub pickup: Geocoded,
    pub destination: Geocoded,
    pub route: RouteSummary,
}

#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    pub center: Coordinates,
    pub radius: f64,
    pub drivers: Vec<NearbyDriver>,
}

#[derive(Debug, Serialize)]
pub struct BatchGeocodeResponse {
    pub results: Vec<Geocoded>,
}

async fn geocode(state: &AppState, address: String) -> ApiResult<Geocoded> {
    let coordinates = state.geocoder.geocode(&address).await?;
    Ok(Geocoded {
        address,
        coordinates,
    })
}

/// `GET /api/maps?action=geocode|route|nearby`
pub async fn maps_query(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<MapsQuery>,
) -> ApiResult<Response> {
    match query.action.as_deref() {
        Some("geocode") => {
            let address = required(query.address, "address")?;
            Ok(Json(geocode(&state, address).await?).into_response())
        }
        Some("route") => {
            let pickup = required(query.pickup, "pickup")?;
            let destination = required(query.destination, "destination")?;

            let pickup = geocode(&state, pickup).await?;
            let destination = geocode(&state, destination).await?;
            let distance = haversine_km(pickup.coordinates, destination.coordinates);

            let route = RouteSummary {
                distance,
                duration: estimate_travel_minutes(distance),
                waypoints: vec![pickup.coordinates, destination.coordinates],
            };
            Ok(Json(RouteResponse {
                pickup,
                destination,
                route,
            })
            .into_response())
        }
        Some("nearby") => {
            let (lat, lng) = match (query.lat, query.lng) {
                (Some(lat), Some(lng)) => (lat, lng),
                _ => {
                    return Err(ApiError::Validation(
                        "lat and lng parameters are required".to_string(),
                    ))
                }
            };
            let center = Coordinates::new(lat, lng);
            let radius = query.radius.unwrap_or(DEFAULT_RADIUS_KM);
            let drivers = state.geocoder.nearby_drivers(center, radius).await?;

            Ok(Json(NearbyResponse {
                center,
                radius,
                drivers,
            })
            .into_response())
        }
        _ => Err(ApiError::Validation(
            "Invalid action. Use \"geocode\", \"route\", or \"nearby\"".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct MapsCommand {
    pub action: Option<String>,
    pub address: Option<String>,
    pub addresses: Option<Vec<String>>,
}

/// `POST /api/maps` with `action` of `geocode` or `batch-geocode`
pub async fn maps_command(
    State(state): State<AppState>,
    ApiJson(command): ApiJson<MapsCommand>,
) -> ApiResult<Response> {
    match command.action.as_deref() {
        Some("geocode") => {
            let address = required(command.address, "address")?;
            Ok(Json(geocode(&state, address).await?).into_response())
        }
        Some("batch-geocode") => {
            let addresses = command.addresses.ok_or_else(|| {
                ApiError::Validation("addresses array is required".to_string())
            })?;
            let results =
                try_join_all(addresses.into_iter().map(|a| geocode(&state, a))).await?;
            Ok(Json(BatchGeocodeResponse { results }).into_response())
        }
        _ => Err(ApiError::Validation(
            "Invalid action. Use \"geocode\" or \"batch-geocode\"".to_string(),
        )),
    }
}
