//! Users keyed by their external (Farcaster) identity

use crate::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rating assigned to every newly created user
pub const INITIAL_RATING: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub farcaster_id: String,
    pub wallet_address: String,
    pub role: UserRole,
    pub rating: f64,
}

impl User {
    pub fn new(
        farcaster_id: impl Into<String>,
        wallet_address: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            farcaster_id: farcaster_id.into(),
            wallet_address: wallet_address.into(),
            role,
            rating: INITIAL_RATING,
        }
    }

    pub fn apply_patch(&mut self, patch: UserPatch) -> DomainResult<()> {
        if let Some(rating) = patch.rating {
            if !rating.is_finite() || !(0.0..=5.0).contains(&rating) {
                return Err(DomainError::OutOfRange {
                    field: "rating",
                    min: 0.0,
                    max: 5.0,
                    value: rating,
                });
            }
        }
        if let Some(wallet) = patch.wallet_address {
            if wallet.trim().is_empty() {
                return Err(DomainError::validation("walletAddress must not be empty"));
            }
            self.wallet_address = wallet;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Rider,
    Driver,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Rider => "rider",
            UserRole::Driver => "driver",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rider" => Ok(UserRole::Rider),
            "driver" => Ok(UserRole::Driver),
            other => Err(DomainError::validation(format!(
                "invalid role '{}'; expected one of: rider, driver",
                other
            ))),
        }
    }
}

/// Fields a full update may overwrite
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserPatch {
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub rating: Option<f64>,
}
