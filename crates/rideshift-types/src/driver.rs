//! Driver profiles and the verification gate
//!
//! `verificationStatus` moves `pending → verified | rejected`; `activeStatus`
//! is orthogonal but can only be raised on a verified profile.

use crate::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverProfile {
    pub user_id: String,
    pub vehicle_details: String,
    pub license_number: String,
    pub verification_status: VerificationStatus,
    pub active_status: bool,
}

impl DriverProfile {
    /// New profiles start pending and inactive.
    pub fn new(
        user_id: impl Into<String>,
        vehicle_details: impl Into<String>,
        license_number: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            vehicle_details: vehicle_details.into(),
            license_number: license_number.into(),
            verification_status: VerificationStatus::Pending,
            active_status: false,
        }
    }

    pub fn apply(&mut self, action: DriverAction) -> DomainResult<()> {
        match action {
            DriverAction::Verify => {
                self.verification_status = VerificationStatus::Verified;
                self.active_status = true;
            }
            DriverAction::Reject => {
                self.verification_status = VerificationStatus::Rejected;
                self.active_status = false;
            }
            DriverAction::Activate => {
                if self.verification_status != VerificationStatus::Verified {
                    return Err(DomainError::Precondition(format!(
                        "Driver must be verified before activation (verification status: {})",
                        self.verification_status
                    )));
                }
                self.active_status = true;
            }
            DriverAction::Deactivate => {
                self.active_status = false;
            }
        }
        Ok(())
    }

    pub fn apply_patch(&mut self, patch: DriverPatch) -> DomainResult<()> {
        if let Some(vehicle) = patch.vehicle_details {
            if vehicle.trim().is_empty() {
                return Err(DomainError::validation("vehicleDetails must not be empty"));
            }
            self.vehicle_details = vehicle;
        }
        if let Some(license) = patch.license_number {
            if license.trim().is_empty() {
                return Err(DomainError::validation("licenseNumber must not be empty"));
            }
            self.license_number = license;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(VerificationStatus::Pending),
            "verified" => Ok(VerificationStatus::Verified),
            "rejected" => Ok(VerificationStatus::Rejected),
            other => Err(DomainError::validation(format!(
                "invalid verification status '{}'; expected one of: pending, verified, rejected",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverAction {
    Verify,
    Reject,
    Activate,
    Deactivate,
}

impl FromStr for DriverAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verify" => Ok(DriverAction::Verify),
            "reject" => Ok(DriverAction::Reject),
            "activate" => Ok(DriverAction::Activate),
            "deactivate" => Ok(DriverAction::Deactivate),
            other => Err(DomainError::unknown_action(
                other,
                &["verify", "reject", "activate", "deactivate"],
            )),
        }
    }
}

/// Fields a full update may overwrite
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DriverPatch {
    #[serde(default)]
    pub vehicle_details: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
}
