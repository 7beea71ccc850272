//! External services the registries lean on
//!
//! Geocoding, on-chain payment and driver NFT issuance sit behind these
//! traits so the daemon never depends on a concrete provider. The mocks in
//! `rideshift-adapters` implement them with fixtures and simulated latency.

use crate::error::DomainResult;
use crate::geo::Coordinates;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Address lookup and driver proximity.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> DomainResult<Coordinates>;

    /// Drivers within `radius_km` of `center`.
    async fn nearby_drivers(
        &self,
        center: Coordinates,
        radius_km: f64,
    ) -> DomainResult<Vec<NearbyDriver>>;
}

/// Ride payment settlement.
#[async_trait]
pub trait PaymentRail: Send + Sync {
    /// Settle `amount` for a ride. Amounts must be strictly positive.
    async fn transfer(
        &self,
        ride_id: &str,
        amount: f64,
        from_address: &str,
        to_address: &str,
    ) -> DomainResult<PaymentReceipt>;

    async fn status(&self, transaction_hash: &str) -> DomainResult<PaymentStatus>;

    async fn estimate_gas(&self, amount: f64, to_address: &str) -> DomainResult<GasEstimate>;
}

/// Driver credential NFTs.
#[async_trait]
pub trait NftIssuer: Send + Sync {
    async fn mint(
        &self,
        user_id: &str,
        credentials: &DriverCredentials,
    ) -> DomainResult<NftMintReceipt>;

    async fn metadata(&self, token_id: &str) -> DomainResult<NftToken>;

    async fn transfer(
        &self,
        token_id: &str,
        from_address: &str,
        to_address: &str,
    ) -> DomainResult<NftTransferReceipt>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyDriver {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    /// Kilometres from the search center.
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub ride_id: String,
    pub amount: f64,
    pub from_address: String,
    pub to_address: String,
    pub transaction_hash: String,
    pub status: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub gas_used: String,
    pub gas_price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    pub transaction_hash: String,
    pub status: String,
    pub block_number: u64,
    pub confirmations: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Gas quote; all amounts are wei as decimal strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasEstimate {
    pub gas_limit: String,
    pub gas_price: String,
    pub max_fee_per_gas: String,
    pub max_priority_fee_per_gas: String,
    pub estimated_cost: String,
    #[serde(rename = "estimatedCostUSD")]
    pub estimated_cost_usd: String,
}

/// Vehicle and license details minted into a driver NFT
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverCredentials {
    pub vehicle_details: String,
    pub license_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftAttribute {
    pub trait_type: String,
    pub value: serde_json::Value,
}

impl NftAttribute {
    pub fn new(trait_type: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            trait_type: trait_type.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    pub attributes: Vec<NftAttribute>,
}

/// A minted token as seen by a metadata lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftToken {
    pub token_id: String,
    #[serde(flatten)]
    pub metadata: NftMetadata,
    pub owner: String,
    pub contract_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftMintReceipt {
    pub user_id: String,
    pub token_id: u64,
    pub transaction_hash: String,
    pub contract_address: String,
    pub metadata: NftMetadata,
    pub status: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub gas_used: String,
    pub gas_price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftTransferReceipt {
    pub token_id: String,
    pub from_address: String,
    pub to_address: String,
    pub transaction_hash: String,
    pub status: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub gas_used: String,
    pub gas_price: String,
}
