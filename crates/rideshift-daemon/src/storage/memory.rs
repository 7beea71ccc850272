//! In-memory storage implementation

use super::traits::*;
use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use rideshift_types::{
    CommissionProposal, DomainResult, DriverAction, DriverPatch, DriverProfile, ProposalId,
    ProposalPatch, ProposalStatus, Ride, RideAction, RideId, RidePatch, RideStatus, User,
    UserPatch, UserRole, VerificationStatus, VoteAction,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory storage for development and testing
///
/// Collections are insertion-ordered vectors. Lookups are linear, which is
/// fine at demo scale.
#[derive(Debug)]
pub struct InMemoryStorage {
    rides: Arc<RwLock<Vec<Ride>>>,
    drivers: Arc<RwLock<Vec<DriverProfile>>>,
    proposals: Arc<RwLock<Vec<CommissionProposal>>>,
    users: Arc<RwLock<Vec<User>>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create an empty in-memory storage
    pub fn new() -> Self {
        Self {
            rides: Arc::new(RwLock::new(Vec::new())),
            drivers: Arc::new(RwLock::new(Vec::new())),
            proposals: Arc::new(RwLock::new(Vec::new())),
            users: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Storage preloaded with the demo records
    pub fn with_demo_data() -> Self {
        let now = Utc::now();

        let ride = Ride {
            ride_id: RideId::new("ride_001"),
            requester_id: "demo-user".to_string(),
            driver_id: Some("demo-driver".to_string()),
            pickup_location: "Times Square, New York".to_string(),
            dropoff_location: "Central Park, New York".to_string(),
            request_timestamp: now - Duration::minutes(60),
            pickup_timestamp: Some(now - Duration::minutes(55)),
            complete_timestamp: Some(now - Duration::minutes(50)),
            fare_amount: 15.50,
            commission_rate: 0.15,
            status: RideStatus::Completed,
        };

        let driver = DriverProfile {
            user_id: "demo-driver".to_string(),
            vehicle_details: "2020 Toyota Camry, Blue".to_string(),
            license_number: "DL123456789".to_string(),
            verification_status: VerificationStatus::Verified,
            active_status: true,
        };

        let proposals = vec![
            CommissionProposal {
                proposal_id: ProposalId::new("prop_001"),
                proposer_id: "demo-user".to_string(),
                new_rate: 0.12,
                status: ProposalStatus::Pending,
                creation_timestamp: now - Duration::days(1),
                vote_count: 45,
            },
            CommissionProposal {
                proposal_id: ProposalId::new("prop_002"),
                proposer_id: "demo-driver".to_string(),
                new_rate: 0.18,
                status: ProposalStatus::Pending,
                creation_timestamp: now - Duration::days(2),
                vote_count: 23,
            },
        ];

        let user = User {
            farcaster_id: "demo-user".to_string(),
            wallet_address: "0x1234567890123456789012345678901234567890".to_string(),
            role: UserRole::Rider,
            rating: 4.8,
        };

        Self {
            rides: Arc::new(RwLock::new(vec![ride])),
            drivers: Arc::new(RwLock::new(vec![driver])),
            proposals: Arc::new(RwLock::new(proposals)),
            users: Arc::new(RwLock::new(vec![user])),
        }
    }
}

/// Apply `change` to a copy of the first matching record and commit the copy
/// only if the change succeeds. Runs under the caller's write guard.
fn mutate<T, P, F>(records: &mut [T], what: &str, is_target: P, change: F) -> StorageResult<T>
where
    T: Clone,
    P: Fn(&T) -> bool,
    F: FnOnce(&mut T) -> DomainResult<()>,
{
    let slot = records
        .iter_mut()
        .find(|record| is_target(&**record))
        .ok_or_else(|| StorageError::NotFound(format!("{what} not found")))?;

    let mut updated = slot.clone();
    change(&mut updated)?;
    *slot = updated.clone();
    Ok(updated)
}

#[async_trait]
impl RideStorage for InMemoryStorage {
    async fn list_rides(&self, filter: &RideFilter) -> StorageResult<Vec<Ride>> {
        let rides = self.rides.read().await;
        Ok(rides.iter().filter(|r| filter.matches(r)).cloned().collect())
    }

    async fn get_ride(&self, id: &RideId) -> StorageResult<Option<Ride>> {
        let rides = self.rides.read().await;
        Ok(rides.iter().find(|r| &r.ride_id == id).cloned())
    }

    async fn insert_ride(&self, ride: Ride) -> StorageResult<Ride> {
        let mut rides = self.rides.write().await;
        if rides.iter().any(|r| r.ride_id == ride.ride_id) {
            return Err(StorageError::Conflict(format!(
                "Ride {} already exists",
                ride.ride_id
            )));
        }
        rides.push(ride.clone());
        Ok(ride)
    }

    async fn update_ride(&self, id: &RideId, patch: RidePatch) -> StorageResult<Ride> {
        let mut rides = self.rides.write().await;
        mutate(
            rides.as_mut_slice(),
            "Ride",
            |r| &r.ride_id == id,
            |r| r.apply_patch(patch),
        )
    }

    async fn transition_ride(&self, id: &RideId, action: RideAction) -> StorageResult<Ride> {
        let mut rides = self.rides.write().await;
        mutate(
            rides.as_mut_slice(),
            "Ride",
            |r| &r.ride_id == id,
            |r| r.apply(action, Utc::now()),
        )
    }
}

#[async_trait]
impl DriverStorage for InMemoryStorage {
    async fn list_drivers(&self, filter: &DriverFilter) -> StorageResult<Vec<DriverProfile>> {
        let drivers = self.drivers.read().await;
        Ok(drivers.iter().filter(|d| filter.matches(d)).cloned().collect())
    }

    async fn get_driver(&self, user_id: &str) -> StorageResult<Option<DriverProfile>> {
        let drivers = self.drivers.read().await;
        Ok(drivers.iter().find(|d| d.user_id == user_id).cloned())
    }

    async fn insert_driver(&self, driver: DriverProfile) -> StorageResult<DriverProfile> {
        let mut drivers = self.drivers.write().await;
        if drivers.iter().any(|d| d.user_id == driver.user_id) {
            return Err(StorageError::Conflict(
                "Driver profile already exists".to_string(),
            ));
        }
        drivers.push(driver.clone());
        Ok(driver)
    }

    async fn update_driver(
        &self,
        user_id: &str,
        patch: DriverPatch,
    ) -> StorageResult<DriverProfile> {
        let mut drivers = self.drivers.write().await;
        mutate(
            drivers.as_mut_slice(),
            "Driver profile",
            |d| d.user_id == user_id,
            |d| d.apply_patch(patch),
        )
    }

    async fn apply_driver_action(
        &self,
        user_id: &str,
        action: DriverAction,
    ) -> StorageResult<DriverProfile> {
        let mut drivers = self.drivers.write().await;
        mutate(
            drivers.as_mut_slice(),
            "Driver profile",
            |d| d.user_id == user_id,
            |d| d.apply(action),
        )
    }
}

#[async_trait]
impl ProposalStorage for InMemoryStorage {
    async fn list_proposals(
        &self,
        filter: &ProposalFilter,
    ) -> StorageResult<Vec<CommissionProposal>> {
        let proposals = self.proposals.read().await;
        Ok(proposals
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn get_proposal(&self, id: &ProposalId) -> StorageResult<Option<CommissionProposal>> {
        let proposals = self.proposals.read().await;
        Ok(proposals.iter().find(|p| &p.proposal_id == id).cloned())
    }

    async fn insert_proposal(
        &self,
        proposal: CommissionProposal,
    ) -> StorageResult<CommissionProposal> {
        let mut proposals = self.proposals.write().await;
        if proposals
            .iter()
            .any(|p| p.proposal_id == proposal.proposal_id)
        {
            return Err(StorageError::Conflict(format!(
                "Proposal {} already exists",
                proposal.proposal_id
            )));
        }
        proposals.push(proposal.clone());
        Ok(proposal)
    }

    async fn update_proposal(
        &self,
        id: &ProposalId,
        patch: ProposalPatch,
    ) -> StorageResult<CommissionProposal> {
        let mut proposals = self.proposals.write().await;
        mutate(
            proposals.as_mut_slice(),
            "Proposal",
            |p| &p.proposal_id == id,
            |p| p.apply_patch(patch),
        )
    }

    async fn cast_vote(
        &self,
        id: &ProposalId,
        action: VoteAction,
    ) -> StorageResult<CommissionProposal> {
        let mut proposals = self.proposals.write().await;
        mutate(
            proposals.as_mut_slice(),
            "Proposal",
            |p| &p.proposal_id == id,
            |p| p.vote(action),
        )
    }
}

#[async_trait]
impl UserStorage for InMemoryStorage {
    async fn list_users(&self, filter: &UserFilter) -> StorageResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.iter().filter(|u| filter.matches(u)).cloned().collect())
    }

    async fn get_user(&self, farcaster_id: &str) -> StorageResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.farcaster_id == farcaster_id).cloned())
    }

    async fn insert_user(&self, user: User) -> StorageResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.farcaster_id == user.farcaster_id) {
            return Err(StorageError::Conflict("User already exists".to_string()));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, farcaster_id: &str, patch: UserPatch) -> StorageResult<User> {
        let mut users = self.users.write().await;
        mutate(
            users.as_mut_slice(),
            "User",
            |u| u.farcaster_id == farcaster_id,
            |u| u.apply_patch(patch),
        )
    }
}

impl Storage for InMemoryStorage {}

#[cfg(test)]
mod tests {
    use super::*;
    use rideshift_types::DomainError;

    fn requested_ride() -> Ride {
        Ride::request("rider-1", "Times Square, New York", "Wall Street, New York", 14.09, 0.15)
    }

    #[tokio::test]
    async fn test_ride_lifecycle() {
        let storage = InMemoryStorage::new();
        let ride = storage.insert_ride(requested_ride()).await.unwrap();

        let accepted = storage
            .transition_ride(
                &ride.ride_id,
                RideAction::Accept {
                    driver_id: "driver-1".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(accepted.status, RideStatus::Accepted);
        assert_eq!(accepted.driver_id.as_deref(), Some("driver-1"));

        let started = storage
            .transition_ride(&ride.ride_id, RideAction::Start)
            .await
            .unwrap();
        assert!(started.pickup_timestamp.is_some());

        let completed = storage
            .transition_ride(&ride.ride_id, RideAction::Complete)
            .await
            .unwrap();
        assert_eq!(completed.status, RideStatus::Completed);
        assert!(completed.complete_timestamp.is_some());
    }

    #[tokio::test]
    async fn test_failed_transition_leaves_record_unchanged() {
        let storage = InMemoryStorage::new();
        let ride = storage.insert_ride(requested_ride()).await.unwrap();

        let err = storage
            .transition_ride(&ride.ride_id, RideAction::Complete)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::Domain(DomainError::InvalidState(_))
        ));

        let stored = storage.get_ride(&ride.ride_id).await.unwrap().unwrap();
        assert_eq!(stored, ride);
    }

    #[tokio::test]
    async fn test_unknown_ride_is_not_found() {
        let storage = InMemoryStorage::new();
        let err = storage
            .transition_ride(&RideId::new("ride_missing"), RideAction::Cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_filters_preserve_insertion_order() {
        let storage = InMemoryStorage::new();
        let first = storage.insert_ride(requested_ride()).await.unwrap();
        let second = storage
            .insert_ride(Ride::request("rider-2", "a", "b", 10.0, 0.15))
            .await
            .unwrap();
        let third = storage.insert_ride(requested_ride()).await.unwrap();

        let all = storage.list_rides(&RideFilter::default()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|r| r.ride_id.clone()).collect();
        assert_eq!(ids, vec![first.ride_id.clone(), second.ride_id, third.ride_id.clone()]);

        let filter = RideFilter {
            requester_id: Some("rider-1".to_string()),
            ..Default::default()
        };
        let mine = storage.list_rides(&filter).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].ride_id, first.ride_id);
        assert_eq!(mine[1].ride_id, third.ride_id);

        let none = RideFilter {
            status: Some(RideStatus::InProgress),
            ..Default::default()
        };
        assert!(storage.list_rides(&none).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_user_conflicts() {
        let storage = InMemoryStorage::new();
        let user = User::new("fc-1", "0xabc", UserRole::Rider);
        storage.insert_user(user.clone()).await.unwrap();

        let err = storage.insert_user(user).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));
        assert_eq!(
            storage.list_users(&UserFilter::default()).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_driver_activation_requires_verification() {
        let storage = InMemoryStorage::new();
        storage
            .insert_driver(DriverProfile::new("drv", "2019 Honda Civic", "DL-1"))
            .await
            .unwrap();

        let err = storage
            .apply_driver_action("drv", DriverAction::Activate)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::Domain(DomainError::Precondition(_))
        ));

        storage
            .apply_driver_action("drv", DriverAction::Verify)
            .await
            .unwrap();
        storage
            .apply_driver_action("drv", DriverAction::Deactivate)
            .await
            .unwrap();
        let active = storage
            .apply_driver_action("drv", DriverAction::Activate)
            .await
            .unwrap();
        assert!(active.active_status);
    }

    #[tokio::test]
    async fn test_concurrent_votes_are_not_lost() {
        let storage = Arc::new(InMemoryStorage::new());
        let proposal = storage
            .insert_proposal(CommissionProposal::open("p", 0.10).unwrap())
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..50 {
            let storage = storage.clone();
            let id = proposal.proposal_id.clone();
            handles.push(tokio::spawn(async move {
                let action = if i % 5 == 0 {
                    VoteAction::Oppose
                } else {
                    VoteAction::Support
                };
                storage.cast_vote(&id, action).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let stored = storage
            .get_proposal(&proposal.proposal_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.vote_count, 40 - 10);
    }

    #[tokio::test]
    async fn test_demo_data_is_seeded() {
        let storage = InMemoryStorage::with_demo_data();
        let ride = storage
            .get_ride(&RideId::new("ride_001"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ride.status, RideStatus::Completed);

        let pending = ProposalFilter {
            status: Some(ProposalStatus::Pending),
            ..Default::default()
        };
        assert_eq!(storage.list_proposals(&pending).await.unwrap().len(), 2);

        let user = storage.get_user("demo-user").await.unwrap().unwrap();
        assert_eq!(user.rating, 4.8);
    }
}
