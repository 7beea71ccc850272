//! Health and status handlers

use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use crate::storage::{
    DriverFilter, DriverStorage, ProposalFilter, ProposalStorage, RideFilter, RideStorage,
    UserFilter, UserStorage,
};
use axum::{extract::State, Json};
use rideshift_types::ProposalStatus;
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
    })
}

/// Daemon status response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaemonStatusResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub stats: RegistryStats,
}

/// Record counts per registry
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStats {
    pub total_rides: usize,
    pub open_rides: usize,
    pub total_drivers: usize,
    pub active_drivers: usize,
    pub total_proposals: usize,
    pub pending_proposals: usize,
    pub total_users: usize,
}

/// Daemon status endpoint
pub async fn daemon_status(State(state): State<AppState>) -> ApiResult<Json<DaemonStatusResponse>> {
    let rides = state.storage.list_rides(&RideFilter::default()).await?;
    let drivers = state.storage.list_drivers(&DriverFilter::default()).await?;
    let proposals = state
        .storage
        .list_proposals(&ProposalFilter::default())
        .await?;
    let users = state.storage.list_users(&UserFilter::default()).await?;

    let open_rides = rides
        .iter()
        .filter(|r| !r.status.is_terminal())
        .count();
    let active_drivers = drivers.iter().filter(|d| d.active_status).count();
    let pending_proposals = proposals
        .iter()
        .filter(|p| p.status == ProposalStatus::Pending)
        .count();

    Ok(Json(DaemonStatusResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
        started_at: state.started_at,
        stats: RegistryStats {
            total_rides: rides.len(),
            open_rides,
            total_drivers: drivers.len(),
            active_drivers,
            total_proposals: proposals.len(),
            pending_proposals,
            total_users: users.len(),
        },
    }))
}
