//! Application state for API handlers

use crate::config::{DaemonConfig, FareConfig};
use crate::storage::{InMemoryStorage, Storage};
use rideshift_adapters::{MockGeocoder, MockNftIssuer, MockPaymentRail};
use rideshift_types::{Geocoder, NftIssuer, PaymentRail};
use std::sync::Arc;
use std::time::Duration;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Storage backend
    pub storage: Arc<dyn Storage>,

    /// Address lookup and nearby drivers
    pub geocoder: Arc<dyn Geocoder>,

    /// Payment settlement
    pub payments: Arc<dyn PaymentRail>,

    /// Driver credential NFTs
    pub nft: Arc<dyn NftIssuer>,

    /// Pricing for new rides
    pub fare: FareConfig,

    /// Simulated delay on realtime polls
    pub realtime_latency: Duration,

    /// Daemon version
    pub version: String,

    /// Daemon start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        storage: Arc<dyn Storage>,
        geocoder: Arc<dyn Geocoder>,
        payments: Arc<dyn PaymentRail>,
        nft: Arc<dyn NftIssuer>,
        fare: FareConfig,
        realtime_latency: Duration,
    ) -> Self {
        Self {
            storage,
            geocoder,
            payments,
            nft,
            fare,
            realtime_latency,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: chrono::Utc::now(),
        }
    }

    /// In-memory storage and mock collaborators wired from configuration
    pub fn from_config(config: &DaemonConfig) -> Self {
        let storage = if config.storage.seed_demo_data {
            InMemoryStorage::with_demo_data()
        } else {
            InMemoryStorage::new()
        };
        let sim = &config.simulation;

        Self::new(
            Arc::new(storage),
            Arc::new(MockGeocoder::new(sim.geocode())),
            Arc::new(MockPaymentRail::new(sim.payment(), sim.payment_status())),
            Arc::new(MockNftIssuer::new(sim.nft_mint(), sim.nft_transfer())),
            config.fare.clone(),
            sim.realtime(),
        )
    }

    /// Get uptime as a human-readable string
    pub fn uptime(&self) -> String {
        let duration = chrono::Utc::now() - self.started_at;
        let secs = duration.num_seconds();

        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else if secs < 86400 {
            format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
        } else {
            format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
        }
    }
}
