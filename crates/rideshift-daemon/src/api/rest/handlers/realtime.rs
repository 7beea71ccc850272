//! Realtime feed over plain HTTP polling
//!
//! Clients poll `GET /api/ws` for snapshots drawn from the live registries
//! and `POST /api/ws` to manage subscriptions. Nothing is pushed.

use crate::api::rest::extract::{required, ApiJson, ApiQuery};
use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::storage::{ProposalFilter, ProposalStorage, RideFilter, RideStorage};
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use rideshift_adapters::DEFAULT_COORDINATES;
use rideshift_types::{
    estimate_travel_minutes, Coordinates, ProposalId, ProposalStatus, RideId, RideStatus,
};
use serde::{Deserialize, Serialize};

const NEARBY_RADIUS_KM: f64 = 5.0;
const DEFAULT_CHANNELS: [&str; 3] = ["rides", "drivers", "governance"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollQuery {
    pub action: Option<String>,
    pub user_id: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RideUpdate {
    pub ride_id: RideId,
    pub status: RideStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<String>,
    #[serde(
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub estimated_pickup: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverLocation {
    pub driver_id: String,
    pub location: Coordinates,
    pub distance: f64,
    /// Minutes
    pub eta: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalUpdate {
    pub proposal_id: ProposalId,
    pub vote_count: i64,
    pub status: ProposalStatus,
}

/// One poll result, tagged by feed
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedSnapshot {
    #[serde(rename_all = "camelCase")]
    RideUpdate {
        user_id: String,
        rides: Vec<RideUpdate>,
    },
    #[serde(rename_all = "camelCase")]
    DriverLocation {
        user_id: String,
        drivers: Vec<DriverLocation>,
    },
    #[serde(rename_all = "camelCase")]
    GovernanceUpdate {
        user_id: String,
        proposals: Vec<ProposalUpdate>,
    },
}

/// Poll one of `ride-updates`, `driver-location` or `governance-updates`
pub async fn poll_updates(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PollQuery>,
) -> ApiResult<Response> {
    let action = required(query.action, "action")?;
    let user_id = required(query.user_id, "userId")?;

    let snapshot = match action.as_str() {
        "ride-updates" => {
            let filter = RideFilter::default();
            let now = Utc::now();
            let rides = state
                .storage
                .list_rides(&filter)
                .await?
                .into_iter()
                .filter(|r| r.involves(&user_id) && !r.status.is_terminal())
                .map(|r| RideUpdate {
                    estimated_pickup: (r.status == RideStatus::Accepted)
                        .then(|| now + Duration::minutes(5)),
                    ride_id: r.ride_id,
                    status: r.status,
                    driver_id: r.driver_id,
                })
                .collect();
            FeedSnapshot::RideUpdate { user_id, rides }
        }
        "driver-location" => {
            let center = match (query.lat, query.lng) {
                (Some(lat), Some(lng)) => Coordinates::new(lat, lng),
                _ => DEFAULT_COORDINATES,
            };
            let drivers = state
                .geocoder
                .nearby_drivers(center, NEARBY_RADIUS_KM)
                .await?
                .into_iter()
                .map(|d| DriverLocation {
                    eta: estimate_travel_minutes(d.distance),
                    location: Coordinates::new(d.lat, d.lng),
                    distance: d.distance,
                    driver_id: d.id,
                })
                .collect();
            FeedSnapshot::DriverLocation { user_id, drivers }
        }
        "governance-updates" => {
            let filter = ProposalFilter {
                status: Some(ProposalStatus::Pending),
                ..Default::default()
            };
            let proposals = state
                .storage
                .list_proposals(&filter)
                .await?
                .into_iter()
                .map(|p| ProposalUpdate {
                    proposal_id: p.proposal_id,
                    vote_count: p.vote_count,
                    status: p.status,
                })
                .collect();
            FeedSnapshot::GovernanceUpdate { user_id, proposals }
        }
        other => {
            return Err(ApiError::Validation(format!(
                "Invalid action '{other}'; expected one of: ride-updates, driver-location, governance-updates"
            )))
        }
    };

    if !state.realtime_latency.is_zero() {
        tokio::time::sleep(state.realtime_latency).await;
    }

    Ok(([(header::CACHE_CONTROL, "no-cache")], Json(snapshot)).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct MessageData {
    pub channels: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeMessage {
    pub action: Option<String>,
    pub user_id: Option<String>,
    #[serde(default)]
    pub data: Option<MessageData>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageReply {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<Vec<String>>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Handle `subscribe`, `unsubscribe` and `ping`
pub async fn realtime_message(
    ApiJson(message): ApiJson<RealtimeMessage>,
) -> ApiResult<Json<MessageReply>> {
    let action = required(message.action, "action")?;
    let user_id = required(message.user_id, "userId")?;
    let requested = message.data.and_then(|d| d.channels);

    let (kind, channels) = match action.as_str() {
        "subscribe" => (
            "subscription_confirmed",
            Some(requested.unwrap_or_else(|| {
                DEFAULT_CHANNELS.iter().map(|c| c.to_string()).collect()
            })),
        ),
        "unsubscribe" => ("unsubscription_confirmed", Some(requested.unwrap_or_default())),
        "ping" => ("pong", None),
        other => {
            return Err(ApiError::Validation(format!(
                "Invalid action '{other}'; expected one of: subscribe, unsubscribe, ping"
            )))
        }
    };

    tracing::debug!(user_id = %user_id, kind, "Realtime message handled");

    Ok(Json(MessageReply {
        kind,
        user_id,
        channels,
        timestamp: Utc::now(),
    }))
}
