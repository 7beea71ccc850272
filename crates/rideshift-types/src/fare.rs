//! Fare calculation
//!
//! The commission is added on top of the trip subtotal: the platform's cut
//! raises the rider's price instead of being carved out of it.

use crate::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

pub const MIN_COMMISSION_RATE: f64 = 0.05;
pub const MAX_COMMISSION_RATE: f64 = 0.25;
pub const DEFAULT_COMMISSION_RATE: f64 = 0.15;

/// Pricing constants applied to a trip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FareSchedule {
    /// Flat amount charged per ride
    pub base_fare: f64,

    /// Amount per kilometre
    pub per_km_rate: f64,

    /// Amount per minute
    pub per_minute_rate: f64,

    /// Rate used when the caller does not supply one
    pub default_commission_rate: f64,
}

impl Default for FareSchedule {
    fn default() -> Self {
        Self {
            base_fare: 2.50,
            per_km_rate: 1.20,
            per_minute_rate: 0.25,
            default_commission_rate: DEFAULT_COMMISSION_RATE,
        }
    }
}

impl FareSchedule {
    /// Trip price before commission
    pub fn subtotal(&self, distance_meters: f64, duration_seconds: f64) -> f64 {
        let distance_km = distance_meters / 1000.0;
        let duration_minutes = duration_seconds / 60.0;
        self.base_fare + distance_km * self.per_km_rate + duration_minutes * self.per_minute_rate
    }

    /// Trip price with commission; `None` applies the schedule's default rate.
    pub fn fare(
        &self,
        distance_meters: f64,
        duration_seconds: f64,
        commission_rate: Option<f64>,
    ) -> f64 {
        let rate = commission_rate.unwrap_or(self.default_commission_rate);
        let subtotal = self.subtotal(distance_meters, duration_seconds);
        subtotal + subtotal * rate
    }
}

/// Fare under the default schedule.
pub fn calculate_fare(distance_meters: f64, duration_seconds: f64, commission_rate: f64) -> f64 {
    FareSchedule::default().fare(distance_meters, duration_seconds, Some(commission_rate))
}

/// Commission rates are bounded to `[0.05, 0.25]`, inclusive at both ends.
pub fn validate_commission_rate(rate: f64) -> DomainResult<f64> {
    if !rate.is_finite() || !(MIN_COMMISSION_RATE..=MAX_COMMISSION_RATE).contains(&rate) {
        return Err(DomainError::OutOfRange {
            field: "commission rate",
            min: MIN_COMMISSION_RATE,
            max: MAX_COMMISSION_RATE,
            value: rate,
        });
    }
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reference_trip_fare() {
        let fare = calculate_fare(5000.0, 900.0, 0.15);
        assert!((fare - 14.0875).abs() < 1e-9);
    }

    #[test]
    fn default_rate_applies_when_unspecified() {
        let schedule = FareSchedule::default();
        assert_eq!(
            schedule.fare(5000.0, 900.0, None),
            schedule.fare(5000.0, 900.0, Some(0.15))
        );
    }

    #[test]
    fn zero_length_trip_costs_base_fare_plus_commission() {
        let fare = calculate_fare(0.0, 0.0, 0.10);
        assert!((fare - 2.75).abs() < 1e-9);
    }

    #[test]
    fn commission_rate_bounds_are_inclusive() {
        assert!(validate_commission_rate(0.05).is_ok());
        assert!(validate_commission_rate(0.25).is_ok());
        assert!(validate_commission_rate(0.049).is_err());
        assert!(validate_commission_rate(0.251).is_err());
        assert!(validate_commission_rate(f64::NAN).is_err());
    }

    proptest! {
        #[test]
        fn fare_never_below_subtotal(
            distance in 0.0f64..100_000.0,
            duration in 0.0f64..10_800.0,
            rate in MIN_COMMISSION_RATE..=MAX_COMMISSION_RATE,
        ) {
            let schedule = FareSchedule::default();
            let subtotal = schedule.subtotal(distance, duration);
            let fare = schedule.fare(distance, duration, Some(rate));
            prop_assert!(fare >= subtotal);
            prop_assert!((fare - subtotal * (1.0 + rate)).abs() < 1e-6);
        }

        #[test]
        fn rates_outside_bounds_are_rejected(rate in prop_oneof![-1.0f64..0.0499, 0.2501f64..2.0]) {
            prop_assert!(validate_commission_rate(rate).is_err());
        }
    }
}
