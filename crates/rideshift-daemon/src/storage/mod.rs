//! Storage layer for rideshift-daemon
//!
//! Holds the ride, driver, proposal and user registries.

mod memory;
mod traits;

pub use memory::InMemoryStorage;
pub use traits::{
    DriverFilter, DriverStorage, ProposalFilter, ProposalStorage, RideFilter, RideStorage,
    Storage, UserFilter, UserStorage,
};
