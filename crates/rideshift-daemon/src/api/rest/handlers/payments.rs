//! Payment handlers backed by the configured payment rail

use crate::api::rest::extract::{required, ApiJson, ApiQuery};
use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{extract::State, http::StatusCode, Json};
use rideshift_types::{GasEstimate, PaymentReceipt, PaymentStatus};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub ride_id: Option<String>,
    pub amount: Option<f64>,
    pub from_address: Option<String>,
    pub to_address: Option<String>,
}

fn required_amount(amount: Option<f64>) -> ApiResult<f64> {
    amount.ok_or_else(|| ApiError::Validation("amount is required".to_string()))
}

/// Settle a ride payment
pub async fn process_payment(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PaymentRequest>,
) -> ApiResult<(StatusCode, Json<PaymentReceipt>)> {
    let ride_id = required(request.ride_id, "rideId")?;
    let amount = required_amount(request.amount)?;
    let from = required(request.from_address, "fromAddress")?;
    let to = required(request.to_address, "toAddress")?;

    let receipt = state.payments.transfer(&ride_id, amount, &from, &to).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusQuery {
    pub transaction_hash: Option<String>,
}

pub async fn payment_status(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PaymentStatusQuery>,
) -> ApiResult<Json<PaymentStatus>> {
    let hash = required(query.transaction_hash, "transactionHash")?;
    Ok(Json(state.payments.status(&hash).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasEstimateRequest {
    pub amount: Option<f64>,
    pub to_address: Option<String>,
}

pub async fn estimate_gas(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<GasEstimateRequest>,
) -> ApiResult<Json<GasEstimate>> {
    let amount = required_amount(request.amount)?;
    let to = required(request.to_address, "toAddress")?;
    Ok(Json(state.payments.estimate_gas(amount, &to).await?))
}
