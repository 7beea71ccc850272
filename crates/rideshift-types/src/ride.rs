//! Ride records and the ride lifecycle state machine
//!
//! ```text
//! requested ──accept──▶ accepted ──start──▶ in_progress ──complete──▶ completed
//!      └──────────────────────┴──────cancel──────┴──────────────▶ cancelled
//! ```
//!
//! `accept` carries no source-state check, so a ride may be reassigned to a
//! different driver. `cancel` is unconditional.

use crate::error::{DomainError, DomainResult};
use crate::ids::RideId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A ride request and its progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    pub ride_id: RideId,
    pub requester_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<String>,
    pub pickup_location: String,
    pub dropoff_location: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub request_timestamp: DateTime<Utc>,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub pickup_timestamp: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub complete_timestamp: Option<DateTime<Utc>>,
    pub fare_amount: f64,
    pub commission_rate: f64,
    pub status: RideStatus,
}

impl Ride {
    /// A freshly requested ride with a server-generated id.
    pub fn request(
        requester_id: impl Into<String>,
        pickup_location: impl Into<String>,
        dropoff_location: impl Into<String>,
        fare_amount: f64,
        commission_rate: f64,
    ) -> Self {
        Self {
            ride_id: RideId::generate(),
            requester_id: requester_id.into(),
            driver_id: None,
            pickup_location: pickup_location.into(),
            dropoff_location: dropoff_location.into(),
            request_timestamp: Utc::now(),
            pickup_timestamp: None,
            complete_timestamp: None,
            fare_amount,
            commission_rate,
            status: RideStatus::Requested,
        }
    }

    /// Apply a named lifecycle action. The ride is untouched on error.
    pub fn apply(&mut self, action: RideAction, now: DateTime<Utc>) -> DomainResult<()> {
        match action {
            RideAction::Accept { driver_id } => {
                if driver_id.trim().is_empty() {
                    return Err(DomainError::validation(
                        "driverId is required for accept action",
                    ));
                }
                self.driver_id = Some(driver_id);
                self.status = RideStatus::Accepted;
            }
            RideAction::Start => {
                if self.status != RideStatus::Accepted {
                    return Err(DomainError::invalid_state(format!(
                        "Ride must be accepted before starting (current status: {})",
                        self.status
                    )));
                }
                self.pickup_timestamp = Some(now);
                self.status = RideStatus::InProgress;
            }
            RideAction::Complete => {
                if self.status != RideStatus::InProgress {
                    return Err(DomainError::invalid_state(format!(
                        "Ride must be in progress before completing (current status: {})",
                        self.status
                    )));
                }
                self.complete_timestamp = Some(now);
                self.status = RideStatus::Completed;
            }
            RideAction::Cancel => {
                self.status = RideStatus::Cancelled;
            }
        }
        Ok(())
    }

    /// Apply the allow-listed editable fields.
    pub fn apply_patch(&mut self, patch: RidePatch) -> DomainResult<()> {
        if let Some(pickup) = patch.pickup_location {
            if pickup.trim().is_empty() {
                return Err(DomainError::validation("pickupLocation must not be empty"));
            }
            self.pickup_location = pickup;
        }
        if let Some(dropoff) = patch.dropoff_location {
            if dropoff.trim().is_empty() {
                return Err(DomainError::validation("dropoffLocation must not be empty"));
            }
            self.dropoff_location = dropoff;
        }
        Ok(())
    }

    pub fn involves(&self, user_id: &str) -> bool {
        self.requester_id == user_id || self.driver_id.as_deref() == Some(user_id)
    }
}

/// Ride lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideStatus {
    Requested,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl RideStatus {
    pub const ALL: [RideStatus; 5] = [
        RideStatus::Requested,
        RideStatus::Accepted,
        RideStatus::InProgress,
        RideStatus::Completed,
        RideStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RideStatus::Requested => "requested",
            RideStatus::Accepted => "accepted",
            RideStatus::InProgress => "in_progress",
            RideStatus::Completed => "completed",
            RideStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RideStatus::Completed | RideStatus::Cancelled)
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RideStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RideStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "invalid ride status '{}'; expected one of: requested, accepted, in_progress, completed, cancelled",
                    s
                ))
            })
    }
}

/// Named lifecycle transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RideAction {
    Accept { driver_id: String },
    Start,
    Complete,
    Cancel,
}

impl RideAction {
    const NAMES: [&'static str; 4] = ["accept", "start", "complete", "cancel"];

    /// Resolve an action name; `accept` requires a driver id.
    pub fn parse(name: &str, driver_id: Option<String>) -> DomainResult<Self> {
        match name {
            "accept" => match driver_id {
                Some(driver_id) if !driver_id.trim().is_empty() => {
                    Ok(RideAction::Accept { driver_id })
                }
                _ => Err(DomainError::validation(
                    "driverId is required for accept action",
                )),
            },
            "start" => Ok(RideAction::Start),
            "complete" => Ok(RideAction::Complete),
            "cancel" => Ok(RideAction::Cancel),
            other => Err(DomainError::unknown_action(other, &Self::NAMES)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RideAction::Accept { .. } => "accept",
            RideAction::Start => "start",
            RideAction::Complete => "complete",
            RideAction::Cancel => "cancel",
        }
    }
}

/// Fields a full update may overwrite
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RidePatch {
    #[serde(default)]
    pub pickup_location: Option<String>,
    #[serde(default)]
    pub dropoff_location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ride_in(status: RideStatus) -> Ride {
        let mut ride = Ride::request("rider-1", "Times Square", "Central Park", 14.09, 0.15);
        ride.status = status;
        ride
    }

    #[test]
    fn happy_path_sets_timestamps_in_order() {
        let mut ride = ride_in(RideStatus::Requested);
        let now = Utc::now();

        ride.apply(
            RideAction::Accept {
                driver_id: "driver-1".to_string(),
            },
            now,
        )
        .unwrap();
        assert_eq!(ride.status, RideStatus::Accepted);
        assert_eq!(ride.driver_id.as_deref(), Some("driver-1"));
        assert!(ride.pickup_timestamp.is_none());

        ride.apply(RideAction::Start, now).unwrap();
        assert_eq!(ride.status, RideStatus::InProgress);
        assert_eq!(ride.pickup_timestamp, Some(now));
        assert!(ride.complete_timestamp.is_none());

        ride.apply(RideAction::Complete, now).unwrap();
        assert_eq!(ride.status, RideStatus::Completed);
        assert_eq!(ride.complete_timestamp, Some(now));
    }

    #[test]
    fn reaccept_keeps_earlier_timestamps() {
        let mut ride = ride_in(RideStatus::Requested);
        let now = Utc::now();
        let accept = |driver: &str| RideAction::Accept {
            driver_id: driver.to_string(),
        };

        ride.apply(accept("driver-1"), now).unwrap();
        ride.apply(RideAction::Start, now).unwrap();
        ride.apply(RideAction::Complete, now).unwrap();

        ride.apply(accept("driver-2"), now).unwrap();
        assert_eq!(ride.status, RideStatus::Accepted);
        assert_eq!(ride.driver_id.as_deref(), Some("driver-2"));
        assert_eq!(ride.pickup_timestamp, Some(now));
        assert_eq!(ride.complete_timestamp, Some(now));
    }

    #[test]
    fn start_requires_accepted() {
        for status in RideStatus::ALL {
            let mut ride = ride_in(status);
            let result = ride.apply(RideAction::Start, Utc::now());
            if status == RideStatus::Accepted {
                assert!(result.is_ok());
            } else {
                assert!(matches!(result, Err(DomainError::InvalidState(_))));
                assert_eq!(ride.status, status);
                assert!(ride.pickup_timestamp.is_none());
            }
        }
    }

    #[test]
    fn complete_requires_in_progress() {
        for status in RideStatus::ALL {
            let mut ride = ride_in(status);
            let result = ride.apply(RideAction::Complete, Utc::now());
            if status == RideStatus::InProgress {
                assert!(result.is_ok());
            } else {
                assert!(matches!(result, Err(DomainError::InvalidState(_))));
                assert!(ride.complete_timestamp.is_none());
            }
        }
    }

    #[test]
    fn cancel_succeeds_from_every_non_completed_state() {
        for status in RideStatus::ALL
            .into_iter()
            .filter(|s| *s != RideStatus::Completed)
        {
            let mut ride = ride_in(status);
            ride.apply(RideAction::Cancel, Utc::now()).unwrap();
            assert_eq!(ride.status, RideStatus::Cancelled);
        }
    }

    #[test]
    fn accept_reassigns_driver_without_state_check() {
        let mut ride = ride_in(RideStatus::InProgress);
        ride.driver_id = Some("driver-1".to_string());
        ride.apply(
            RideAction::Accept {
                driver_id: "driver-2".to_string(),
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(ride.driver_id.as_deref(), Some("driver-2"));
        assert_eq!(ride.status, RideStatus::Accepted);
    }

    #[test]
    fn parse_rejects_unknown_action_and_missing_driver() {
        assert!(matches!(
            RideAction::parse("teleport", None),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            RideAction::parse("accept", None),
            Err(DomainError::Validation(_))
        ));
        assert_eq!(
            RideAction::parse("accept", Some("d".to_string())).unwrap().name(),
            "accept"
        );
    }

    #[test]
    fn status_parses_wire_names() {
        assert_eq!(
            "in_progress".parse::<RideStatus>().unwrap(),
            RideStatus::InProgress
        );
        assert!("done".parse::<RideStatus>().is_err());
    }

    #[test]
    fn patch_rejects_fields_outside_allow_list() {
        let result: Result<RidePatch, _> =
            serde_json::from_value(serde_json::json!({ "status": "completed" }));
        assert!(result.is_err());
    }

    #[test]
    fn serializes_camel_case_with_millis() {
        let ride = ride_in(RideStatus::Requested);
        let value = serde_json::to_value(&ride).unwrap();
        assert!(value.get("rideId").is_some());
        assert!(value.get("requestTimestamp").unwrap().is_i64());
        assert!(value.get("driverId").is_none());
        assert_eq!(value.get("status").unwrap(), "requested");
    }
}
