//! Configuration for rideshift-daemon

use crate::error::DaemonError;
use rideshift_types::{validate_commission_rate, FareSchedule, DEFAULT_COMMISSION_RATE};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Pricing of new rides
    #[serde(default)]
    pub fare: FareConfig,

    /// Simulated collaborator latency
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            enable_cors: true,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Load the demo ride, driver, proposals and user at startup
    #[serde(default = "default_true")]
    pub seed_demo_data: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: true,
        }
    }
}

/// Fare schedule plus the fixed trip every new ride is priced against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FareConfig {
    #[serde(default = "default_base_fare")]
    pub base_fare: f64,

    #[serde(default = "default_per_km_rate")]
    pub per_km_rate: f64,

    #[serde(default = "default_per_minute_rate")]
    pub per_minute_rate: f64,

    #[serde(default = "default_commission_rate")]
    pub default_commission_rate: f64,

    /// Trip distance used for the creation-time estimate
    #[serde(default = "default_mock_distance")]
    pub mock_distance_meters: f64,

    /// Trip duration used for the creation-time estimate
    #[serde(default = "default_mock_duration")]
    pub mock_duration_seconds: f64,
}

impl Default for FareConfig {
    fn default() -> Self {
        let schedule = FareSchedule::default();
        Self {
            base_fare: schedule.base_fare,
            per_km_rate: schedule.per_km_rate,
            per_minute_rate: schedule.per_minute_rate,
            default_commission_rate: schedule.default_commission_rate,
            mock_distance_meters: default_mock_distance(),
            mock_duration_seconds: default_mock_duration(),
        }
    }
}

impl FareConfig {
    pub fn schedule(&self) -> FareSchedule {
        FareSchedule {
            base_fare: self.base_fare,
            per_km_rate: self.per_km_rate,
            per_minute_rate: self.per_minute_rate,
            default_commission_rate: self.default_commission_rate,
        }
    }

    /// Estimated fare for a new ride at `commission_rate`
    pub fn estimate(&self, commission_rate: f64) -> f64 {
        self.schedule().fare(
            self.mock_distance_meters,
            self.mock_duration_seconds,
            Some(commission_rate),
        )
    }
}

/// Simulated latency per collaborator, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_geocode_ms")]
    pub geocode_ms: u64,

    #[serde(default = "default_payment_ms")]
    pub payment_ms: u64,

    #[serde(default = "default_payment_status_ms")]
    pub payment_status_ms: u64,

    #[serde(default = "default_nft_mint_ms")]
    pub nft_mint_ms: u64,

    #[serde(default = "default_nft_transfer_ms")]
    pub nft_transfer_ms: u64,

    #[serde(default = "default_realtime_ms")]
    pub realtime_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            geocode_ms: default_geocode_ms(),
            payment_ms: default_payment_ms(),
            payment_status_ms: default_payment_status_ms(),
            nft_mint_ms: default_nft_mint_ms(),
            nft_transfer_ms: default_nft_transfer_ms(),
            realtime_ms: default_realtime_ms(),
        }
    }
}

impl SimulationConfig {
    /// No simulated delay anywhere
    pub fn instant() -> Self {
        Self {
            geocode_ms: 0,
            payment_ms: 0,
            payment_status_ms: 0,
            nft_mint_ms: 0,
            nft_transfer_ms: 0,
            realtime_ms: 0,
        }
    }

    pub fn geocode(&self) -> Duration {
        Duration::from_millis(self.geocode_ms)
    }

    pub fn payment(&self) -> Duration {
        Duration::from_millis(self.payment_ms)
    }

    pub fn payment_status(&self) -> Duration {
        Duration::from_millis(self.payment_status_ms)
    }

    pub fn nft_mint(&self) -> Duration {
        Duration::from_millis(self.nft_mint_ms)
    }

    pub fn nft_transfer(&self) -> Duration {
        Duration::from_millis(self.nft_transfer_ms)
    }

    pub fn realtime(&self) -> Duration {
        Duration::from_millis(self.realtime_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn default_base_fare() -> f64 {
    FareSchedule::default().base_fare
}

fn default_per_km_rate() -> f64 {
    FareSchedule::default().per_km_rate
}

fn default_per_minute_rate() -> f64 {
    FareSchedule::default().per_minute_rate
}

fn default_commission_rate() -> f64 {
    DEFAULT_COMMISSION_RATE
}

fn default_mock_distance() -> f64 {
    5000.0
}

fn default_mock_duration() -> f64 {
    900.0
}

fn default_geocode_ms() -> u64 {
    500
}

fn default_payment_ms() -> u64 {
    2000
}

fn default_payment_status_ms() -> u64 {
    500
}

fn default_nft_mint_ms() -> u64 {
    3000
}

fn default_nft_transfer_ms() -> u64 {
    2000
}

fn default_realtime_ms() -> u64 {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Load configuration: defaults, then the optional file, then
    /// `RIDESHIFT_<SECTION>__<KEY>` environment variables.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&DaemonConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("RIDESHIFT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Configuration used by tests: no seed data and no simulated latency
    pub fn testing() -> Self {
        Self {
            storage: StorageConfig {
                seed_demo_data: false,
            },
            simulation: SimulationConfig::instant(),
            ..Default::default()
        }
    }

    /// Reject values that would make the pricing nonsensical
    pub fn validate(&self) -> Result<(), DaemonError> {
        validate_commission_rate(self.fare.default_commission_rate)
            .map_err(|e| DaemonError::Config(format!("fare.default_commission_rate: {e}")))?;

        let fare = &self.fare;
        let amounts = [
            ("fare.base_fare", fare.base_fare),
            ("fare.per_km_rate", fare.per_km_rate),
            ("fare.per_minute_rate", fare.per_minute_rate),
            ("fare.mock_distance_meters", fare.mock_distance_meters),
            ("fare.mock_duration_seconds", fare.mock_duration_seconds),
        ];
        for (name, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(DaemonError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}
