//! User registry handlers

use crate::api::rest::extract::{enum_filter, parse_enum, required, ApiJson, ApiQuery};
use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::storage::{UserFilter, UserStorage};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rideshift_types::{User, UserPatch, UserRole};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub farcaster_id: Option<String>,
    pub role: Option<String>,
}

pub async fn list_users(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> ApiResult<Json<Vec<User>>> {
    let Some(role) = enum_filter(query.role.as_deref()) else {
        return Ok(Json(Vec::new()));
    };
    let filter = UserFilter {
        farcaster_id: query.farcaster_id.filter(|s| !s.is_empty()),
        role,
    };
    Ok(Json(state.storage.list_users(&filter).await?))
}

/// Get a single user by Farcaster ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(farcaster_id): Path<String>,
) -> ApiResult<Json<User>> {
    let user = state
        .storage
        .get_user(&farcaster_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub farcaster_id: Option<String>,
    pub wallet_address: Option<String>,
    pub role: Option<String>,
}

pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let farcaster_id = required(request.farcaster_id, "farcasterId")?;
    let wallet = required(request.wallet_address, "walletAddress")?;
    let role = parse_enum::<UserRole>(request.role.as_deref())?.unwrap_or_default();

    let user = state
        .storage
        .insert_user(User::new(farcaster_id, wallet, role))
        .await?;

    tracing::info!(farcaster_id = %user.farcaster_id, role = %user.role, "User created");

    Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub farcaster_id: Option<String>,
    pub wallet_address: Option<String>,
    pub role: Option<UserRole>,
    pub rating: Option<f64>,
}

pub async fn update_user(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    let farcaster_id = required(request.farcaster_id, "farcasterId")?;
    let patch = UserPatch {
        wallet_address: request.wallet_address,
        role: request.role,
        rating: request.rating,
    };

    let user = state.storage.update_user(&farcaster_id, patch).await?;

    tracing::info!(farcaster_id = %farcaster_id, "Updated user");

    Ok(Json(user))
}
