//! Mock collaborator adapters for RideShift.
//!
//! Every adapter returns fixture data after an optional simulated delay.
//! Latencies default to zero; the daemon wires the configured values in.

#![deny(unsafe_code)]

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use rideshift_types::{
    Coordinates, DomainError, DomainResult, DriverCredentials, GasEstimate, Geocoder,
    NearbyDriver, NftAttribute, NftIssuer, NftMetadata, NftMintReceipt, NftToken,
    NftTransferReceipt, PaymentRail, PaymentReceipt, PaymentStatus,
};
use std::time::Duration;
use uuid::Uuid;

/// Gas price quoted on every mock transaction: 20 gwei.
pub const GAS_PRICE_WEI: u64 = 20_000_000_000;
/// Gas consumed by a plain value transfer.
pub const TRANSFER_GAS: u64 = 21_000;
/// Address of the driver NFT contract.
pub const NFT_CONTRACT_ADDRESS: &str = "0x1234567890123456789012345678901234567890";
/// Fallback coordinates for unknown addresses (New York City center).
pub const DEFAULT_COORDINATES: Coordinates = Coordinates::new(40.7128, -74.0060);

const LANDMARKS: [(&str, Coordinates); 5] = [
    ("Times Square, New York", Coordinates::new(40.7580, -73.9855)),
    ("Central Park, New York", Coordinates::new(40.7829, -73.9654)),
    ("Brooklyn Bridge, New York", Coordinates::new(40.7061, -73.9969)),
    ("Wall Street, New York", Coordinates::new(40.7060, -74.0088)),
    (
        "Empire State Building, New York",
        Coordinates::new(40.7484, -73.9857),
    ),
];

const NEARBY_FIXTURES: [(&str, Coordinates, f64); 3] = [
    ("driver1", Coordinates::new(40.7580, -73.9855), 0.5),
    ("driver2", Coordinates::new(40.7829, -73.9654), 2.1),
    ("driver3", Coordinates::new(40.7061, -73.9969), 3.2),
];

const NFT_IMAGE_BASE: &str = "https://via.placeholder.com/400x400/82e6b3/ffffff?text=Driver+NFT";

async fn simulate(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

/// `0x` followed by 64 lowercase hex characters.
fn transaction_hash() -> String {
    format!("0x{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

fn random_address() -> String {
    let mut rng = rand::thread_rng();
    let hex: String = (0..40)
        .map(|_| char::from_digit(rng.gen_range(0..16), 16).unwrap_or('0'))
        .collect();
    format!("0x{hex}")
}

fn require(value: &str, field: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(())
}

/// Fixture geocoder over five New York landmarks.
#[derive(Debug, Clone, Default)]
pub struct MockGeocoder {
    latency: Duration,
}

impl MockGeocoder {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Coordinates for a known landmark, without delay.
    pub fn lookup(address: &str) -> Coordinates {
        LANDMARKS
            .iter()
            .find(|(name, _)| *name == address)
            .map(|(_, coords)| *coords)
            .unwrap_or(DEFAULT_COORDINATES)
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn geocode(&self, address: &str) -> DomainResult<Coordinates> {
        simulate(self.latency).await;
        let coords = Self::lookup(address);
        tracing::debug!(address, lat = coords.lat, lng = coords.lng, "Geocoded address");
        Ok(coords)
    }

    async fn nearby_drivers(
        &self,
        _center: Coordinates,
        radius_km: f64,
    ) -> DomainResult<Vec<NearbyDriver>> {
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(DomainError::validation(
                "radius must be a non-negative number",
            ));
        }
        // Fixture distances are fixed regardless of the search center.
        Ok(NEARBY_FIXTURES
            .iter()
            .filter(|(_, _, distance)| *distance <= radius_km)
            .map(|(id, coords, distance)| NearbyDriver {
                id: (*id).to_string(),
                lat: coords.lat,
                lng: coords.lng,
                distance: *distance,
            })
            .collect())
    }
}

/// Simulated chain payment rail.
#[derive(Debug, Clone, Default)]
pub struct MockPaymentRail {
    transfer_latency: Duration,
    status_latency: Duration,
}

impl MockPaymentRail {
    pub fn new(transfer_latency: Duration, status_latency: Duration) -> Self {
        Self {
            transfer_latency,
            status_latency,
        }
    }
}

#[async_trait]
impl PaymentRail for MockPaymentRail {
    async fn transfer(
        &self,
        ride_id: &str,
        amount: f64,
        from_address: &str,
        to_address: &str,
    ) -> DomainResult<PaymentReceipt> {
        require(ride_id, "rideId")?;
        require(from_address, "fromAddress")?;
        require(to_address, "toAddress")?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(DomainError::validation("Amount must be greater than 0"));
        }

        simulate(self.transfer_latency).await;

        let receipt = PaymentReceipt {
            ride_id: ride_id.to_string(),
            amount,
            from_address: from_address.to_string(),
            to_address: to_address.to_string(),
            transaction_hash: transaction_hash(),
            status: "completed".to_string(),
            timestamp: Utc::now(),
            gas_used: TRANSFER_GAS.to_string(),
            gas_price: GAS_PRICE_WEI.to_string(),
        };
        tracing::info!(
            ride_id,
            amount,
            tx = %receipt.transaction_hash,
            "Payment settled"
        );
        Ok(receipt)
    }

    async fn status(&self, transaction_hash: &str) -> DomainResult<PaymentStatus> {
        require(transaction_hash, "transactionHash")?;
        simulate(self.status_latency).await;

        let mut rng = rand::thread_rng();
        Ok(PaymentStatus {
            transaction_hash: transaction_hash.to_string(),
            status: "confirmed".to_string(),
            block_number: 18_500_000 + rng.gen_range(0..1000),
            confirmations: rng.gen_range(1..=12),
            timestamp: Utc::now(),
        })
    }

    async fn estimate_gas(&self, amount: f64, to_address: &str) -> DomainResult<GasEstimate> {
        require(to_address, "toAddress")?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(DomainError::validation("Amount must be greater than 0"));
        }
        Ok(GasEstimate {
            gas_limit: TRANSFER_GAS.to_string(),
            gas_price: GAS_PRICE_WEI.to_string(),
            max_fee_per_gas: (GAS_PRICE_WEI * 2).to_string(),
            max_priority_fee_per_gas: 2_000_000_000u64.to_string(),
            estimated_cost: (TRANSFER_GAS * GAS_PRICE_WEI).to_string(),
            estimated_cost_usd: "0.42".to_string(),
        })
    }
}

/// Simulated driver NFT contract.
#[derive(Debug, Clone, Default)]
pub struct MockNftIssuer {
    mint_latency: Duration,
    transfer_latency: Duration,
}

impl MockNftIssuer {
    pub fn new(mint_latency: Duration, transfer_latency: Duration) -> Self {
        Self {
            mint_latency,
            transfer_latency,
        }
    }
}

#[async_trait]
impl NftIssuer for MockNftIssuer {
    async fn mint(
        &self,
        user_id: &str,
        credentials: &DriverCredentials,
    ) -> DomainResult<NftMintReceipt> {
        require(user_id, "userId")?;
        simulate(self.mint_latency).await;

        let now = Utc::now();
        let metadata = NftMetadata {
            name: format!("RideShift Driver - {user_id}"),
            description: format!("Verified RideShift driver NFT for {user_id}"),
            image: NFT_IMAGE_BASE.to_string(),
            attributes: vec![
                NftAttribute::new("Driver Status", "Verified"),
                NftAttribute::new("Vehicle", credentials.vehicle_details.clone()),
                NftAttribute::new("License", credentials.license_number.clone()),
                NftAttribute::new("Verification Date", now.format("%Y-%m-%d").to_string()),
            ],
        };

        let receipt = NftMintReceipt {
            user_id: user_id.to_string(),
            token_id: rand::thread_rng().gen_range(0..1_000_000),
            transaction_hash: transaction_hash(),
            contract_address: NFT_CONTRACT_ADDRESS.to_string(),
            metadata,
            status: "minted".to_string(),
            timestamp: now,
            gas_used: "150000".to_string(),
            gas_price: GAS_PRICE_WEI.to_string(),
        };
        tracing::info!(user_id, token_id = receipt.token_id, "Driver NFT minted");
        Ok(receipt)
    }

    async fn metadata(&self, token_id: &str) -> DomainResult<NftToken> {
        require(token_id, "tokenId")?;
        let mut rng = rand::thread_rng();
        let rides_completed: u32 = rng.gen_range(1..=100);
        let rating = format!("{:.1}", rng.gen_range(3.0..=5.0_f64));

        Ok(NftToken {
            token_id: token_id.to_string(),
            metadata: NftMetadata {
                name: format!("RideShift Driver #{token_id}"),
                description: "Verified RideShift driver NFT".to_string(),
                image: format!("{NFT_IMAGE_BASE}+{token_id}"),
                attributes: vec![
                    NftAttribute::new("Driver Status", "Verified"),
                    NftAttribute::new("Rides Completed", rides_completed),
                    NftAttribute::new("Rating", rating),
                ],
            },
            owner: random_address(),
            contract_address: NFT_CONTRACT_ADDRESS.to_string(),
        })
    }

    async fn transfer(
        &self,
        token_id: &str,
        from_address: &str,
        to_address: &str,
    ) -> DomainResult<NftTransferReceipt> {
        require(token_id, "tokenId")?;
        require(from_address, "fromAddress")?;
        require(to_address, "toAddress")?;
        simulate(self.transfer_latency).await;

        Ok(NftTransferReceipt {
            token_id: token_id.to_string(),
            from_address: from_address.to_string(),
            to_address: to_address.to_string(),
            transaction_hash: transaction_hash(),
            status: "transferred".to_string(),
            timestamp: Utc::now(),
            gas_used: "65000".to_string(),
            gas_price: GAS_PRICE_WEI.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_tx_hash(hash: &str) -> bool {
        hash.len() == 66
            && hash.starts_with("0x")
            && hash[2..].chars().all(|c| c.is_ascii_hexdigit())
    }

    #[tokio::test]
    async fn geocoder_resolves_landmarks_and_falls_back() {
        let geocoder = MockGeocoder::default();
        let ts = geocoder.geocode("Times Square, New York").await.unwrap();
        assert_eq!(ts, Coordinates::new(40.7580, -73.9855));

        let unknown = geocoder.geocode("Nowhere, Nebraska").await.unwrap();
        assert_eq!(unknown, DEFAULT_COORDINATES);
    }

    #[tokio::test]
    async fn nearby_drivers_filtered_by_radius() {
        let geocoder = MockGeocoder::default();
        let all = geocoder
            .nearby_drivers(DEFAULT_COORDINATES, 5.0)
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let close = geocoder
            .nearby_drivers(DEFAULT_COORDINATES, 2.1)
            .await
            .unwrap();
        let ids: Vec<_> = close.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["driver1", "driver2"]);

        assert!(geocoder
            .nearby_drivers(DEFAULT_COORDINATES, -1.0)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn transfer_rejects_non_positive_amounts() {
        let rail = MockPaymentRail::default();
        for amount in [0.0, -3.0, f64::NAN] {
            let err = rail
                .transfer("ride_1", amount, "0xfrom", "0xto")
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn transfer_produces_completed_receipt() {
        let rail = MockPaymentRail::default();
        let receipt = rail
            .transfer("ride_1", 14.09, "0xfrom", "0xto")
            .await
            .unwrap();
        assert!(is_tx_hash(&receipt.transaction_hash));
        assert_eq!(receipt.status, "completed");
        assert_eq!(receipt.gas_used, "21000");
        assert_eq!(receipt.gas_price, "20000000000");
    }

    #[tokio::test]
    async fn status_reports_confirmations_in_range() {
        let rail = MockPaymentRail::default();
        let status = rail.status("0xabc").await.unwrap();
        assert_eq!(status.status, "confirmed");
        assert!(status.block_number >= 18_500_000 && status.block_number < 18_501_000);
        assert!((1..=12).contains(&status.confirmations));
    }

    #[tokio::test]
    async fn gas_estimate_is_fixed_quote() {
        let rail = MockPaymentRail::default();
        let estimate = rail.estimate_gas(10.0, "0xto").await.unwrap();
        assert_eq!(estimate.estimated_cost, "420000000000000");
        assert_eq!(estimate.max_fee_per_gas, "40000000000");
    }

    #[tokio::test]
    async fn mint_embeds_credentials() {
        let issuer = MockNftIssuer::default();
        let credentials = DriverCredentials {
            vehicle_details: "2020 Toyota Prius".to_string(),
            license_number: "DL-1234".to_string(),
        };
        let receipt = issuer.mint("fc-7", &credentials).await.unwrap();
        assert_eq!(receipt.metadata.name, "RideShift Driver - fc-7");
        assert_eq!(receipt.status, "minted");
        assert!(receipt.token_id < 1_000_000);
        assert!(is_tx_hash(&receipt.transaction_hash));

        let vehicle = receipt
            .metadata
            .attributes
            .iter()
            .find(|a| a.trait_type == "Vehicle")
            .unwrap();
        assert_eq!(vehicle.value, "2020 Toyota Prius");
    }

    #[tokio::test]
    async fn metadata_rating_between_three_and_five() {
        let issuer = MockNftIssuer::default();
        let token = issuer.metadata("42").await.unwrap();
        assert_eq!(token.metadata.name, "RideShift Driver #42");
        assert_eq!(token.owner.len(), 42);

        let rating: f64 = token
            .metadata
            .attributes
            .iter()
            .find(|a| a.trait_type == "Rating")
            .and_then(|a| a.value.as_str())
            .unwrap()
            .parse()
            .unwrap();
        assert!((3.0..=5.0).contains(&rating));
    }

    #[tokio::test]
    async fn nft_transfer_requires_addresses() {
        let issuer = MockNftIssuer::default();
        assert!(issuer.transfer("42", "", "0xto").await.is_err());
        let receipt = issuer.transfer("42", "0xfrom", "0xto").await.unwrap();
        assert_eq!(receipt.status, "transferred");
        assert_eq!(receipt.gas_used, "65000");
    }
}
