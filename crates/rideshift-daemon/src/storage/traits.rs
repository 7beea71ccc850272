//! Storage trait definitions
//!
//! Every mutation that reads a record and writes it back is a single trait
//! method, so a backend can run the check and the write under one lock.

use crate::error::StorageResult;
use async_trait::async_trait;
use rideshift_types::{
    CommissionProposal, DriverAction, DriverPatch, DriverProfile, ProposalId, ProposalPatch,
    ProposalStatus, Ride, RideAction, RideId, RidePatch, RideStatus, User, UserPatch, UserRole,
    VerificationStatus, VoteAction,
};

/// Combined storage trait
#[async_trait]
pub trait Storage: RideStorage + DriverStorage + ProposalStorage + UserStorage + Send + Sync {}

/// Equality filters over rides, combined with AND
#[derive(Debug, Clone, Default)]
pub struct RideFilter {
    pub status: Option<RideStatus>,
    pub requester_id: Option<String>,
    pub driver_id: Option<String>,
}

impl RideFilter {
    pub fn matches(&self, ride: &Ride) -> bool {
        self.status.map_or(true, |s| ride.status == s)
            && self
                .requester_id
                .as_deref()
                .map_or(true, |id| ride.requester_id == id)
            && self
                .driver_id
                .as_deref()
                .map_or(true, |id| ride.driver_id.as_deref() == Some(id))
    }
}

#[derive(Debug, Clone, Default)]
pub struct DriverFilter {
    pub user_id: Option<String>,
    pub status: Option<VerificationStatus>,
}

impl DriverFilter {
    pub fn matches(&self, driver: &DriverProfile) -> bool {
        self.user_id
            .as_deref()
            .map_or(true, |id| driver.user_id == id)
            && self
                .status
                .map_or(true, |s| driver.verification_status == s)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProposalFilter {
    pub status: Option<ProposalStatus>,
    pub proposer_id: Option<String>,
}

impl ProposalFilter {
    pub fn matches(&self, proposal: &CommissionProposal) -> bool {
        self.status.map_or(true, |s| proposal.status == s)
            && self
                .proposer_id
                .as_deref()
                .map_or(true, |id| proposal.proposer_id == id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub farcaster_id: Option<String>,
    pub role: Option<UserRole>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        self.farcaster_id
            .as_deref()
            .map_or(true, |id| user.farcaster_id == id)
            && self.role.map_or(true, |r| user.role == r)
    }
}

/// Storage for rides
#[async_trait]
pub trait RideStorage: Send + Sync {
    /// Rides matching the filter, in insertion order
    async fn list_rides(&self, filter: &RideFilter) -> StorageResult<Vec<Ride>>;

    /// Get a ride by ID
    async fn get_ride(&self, id: &RideId) -> StorageResult<Option<Ride>>;

    /// Append a new ride
    async fn insert_ride(&self, ride: Ride) -> StorageResult<Ride>;

    /// Apply allow-listed edits
    async fn update_ride(&self, id: &RideId, patch: RidePatch) -> StorageResult<Ride>;

    /// Run a lifecycle action
    async fn transition_ride(&self, id: &RideId, action: RideAction) -> StorageResult<Ride>;
}

/// Storage for driver profiles, keyed by user ID
#[async_trait]
pub trait DriverStorage: Send + Sync {
    async fn list_drivers(&self, filter: &DriverFilter) -> StorageResult<Vec<DriverProfile>>;

    async fn get_driver(&self, user_id: &str) -> StorageResult<Option<DriverProfile>>;

    /// Append a new profile; the user ID must be unused
    async fn insert_driver(&self, driver: DriverProfile) -> StorageResult<DriverProfile>;

    async fn update_driver(&self, user_id: &str, patch: DriverPatch)
        -> StorageResult<DriverProfile>;

    async fn apply_driver_action(
        &self,
        user_id: &str,
        action: DriverAction,
    ) -> StorageResult<DriverProfile>;
}

/// Storage for commission proposals
#[async_trait]
pub trait ProposalStorage: Send + Sync {
    async fn list_proposals(
        &self,
        filter: &ProposalFilter,
    ) -> StorageResult<Vec<CommissionProposal>>;

    async fn get_proposal(&self, id: &ProposalId) -> StorageResult<Option<CommissionProposal>>;

    async fn insert_proposal(
        &self,
        proposal: CommissionProposal,
    ) -> StorageResult<CommissionProposal>;

    async fn update_proposal(
        &self,
        id: &ProposalId,
        patch: ProposalPatch,
    ) -> StorageResult<CommissionProposal>;

    /// Apply one vote to the tally
    async fn cast_vote(
        &self,
        id: &ProposalId,
        action: VoteAction,
    ) -> StorageResult<CommissionProposal>;
}

/// Storage for users, keyed by Farcaster ID
#[async_trait]
pub trait UserStorage: Send + Sync {
    async fn list_users(&self, filter: &UserFilter) -> StorageResult<Vec<User>>;

    async fn get_user(&self, farcaster_id: &str) -> StorageResult<Option<User>>;

    /// Append a new user; the Farcaster ID must be unused
    async fn insert_user(&self, user: User) -> StorageResult<User>;

    async fn update_user(&self, farcaster_id: &str, patch: UserPatch) -> StorageResult<User>;
}
