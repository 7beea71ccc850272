//! Driver NFT handlers

use crate::api::rest::extract::{required, ApiJson, ApiQuery};
use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{extract::State, http::StatusCode, Json};
use rideshift_types::{DriverCredentials, NftMintReceipt, NftToken, NftTransferReceipt};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintRequest {
    pub user_id: Option<String>,
    pub driver_profile: Option<DriverCredentials>,
}

/// Mint a credential NFT for a driver
pub async fn mint_nft(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<MintRequest>,
) -> ApiResult<(StatusCode, Json<NftMintReceipt>)> {
    let user_id = required(request.user_id, "userId")?;
    let credentials = request
        .driver_profile
        .ok_or_else(|| ApiError::Validation("driverProfile is required".to_string()))?;

    let receipt = state.nft.mint(&user_id, &credentials).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenQuery {
    pub token_id: Option<String>,
}

pub async fn nft_metadata(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TokenQuery>,
) -> ApiResult<Json<NftToken>> {
    let token_id = required(query.token_id, "tokenId")?;
    Ok(Json(state.nft.metadata(&token_id).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// Mint receipts carry numeric ids; strings are accepted too
    pub token_id: Option<Value>,
    pub from_address: Option<String>,
    pub to_address: Option<String>,
}

fn token_id_text(value: Option<Value>) -> ApiResult<String> {
    match value {
        Some(Value::String(s)) => required(Some(s), "tokenId"),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(ApiError::Validation("tokenId is required".to_string())),
    }
}

pub async fn transfer_nft(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TransferRequest>,
) -> ApiResult<Json<NftTransferReceipt>> {
    let token_id = token_id_text(request.token_id)?;
    let from = required(request.from_address, "fromAddress")?;
    let to = required(request.to_address, "toAddress")?;

    let receipt = state.nft.transfer(&token_id, &from, &to).await?;

    tracing::info!(token_id = %token_id, to = %to, "Driver NFT transferred");

    Ok(Json(receipt))
}
