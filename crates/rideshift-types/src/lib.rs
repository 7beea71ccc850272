//! RideShift Types - Core domain model for the rideshare service
//!
//! Every registry the daemon serves (rides, drivers, proposals, users) is a
//! flat collection of the records defined here. The records own their state
//! machines: a transition is a method on the record that either mutates it or
//! returns a [`DomainError`] without touching it.
//!
//! ## Key Concepts
//!
//! - **Ride**: `requested → accepted → in_progress → completed`, plus `cancel`
//! - **DriverProfile**: verification gate with an orthogonal active flag
//! - **CommissionProposal**: net vote tally, mutable only while pending
//! - **Fare**: subtotal with commission added on top
//! - **Collaborators**: geocoding, payment rail and NFT issuance seams

#![deny(unsafe_code)]

pub mod collaborators;
pub mod display;
pub mod driver;
pub mod error;
pub mod fare;
pub mod geo;
pub mod governance;
pub mod ids;
pub mod ride;
pub mod user;

pub use collaborators::{
    DriverCredentials, GasEstimate, Geocoder, NearbyDriver, NftAttribute, NftIssuer, NftMetadata,
    NftMintReceipt, NftToken, NftTransferReceipt, PaymentRail, PaymentReceipt, PaymentStatus,
};
pub use display::{format_currency, format_distance, format_duration};
pub use driver::{DriverAction, DriverPatch, DriverProfile, VerificationStatus};
pub use error::{DomainError, DomainResult};
pub use fare::{
    calculate_fare, validate_commission_rate, FareSchedule, DEFAULT_COMMISSION_RATE,
    MAX_COMMISSION_RATE, MIN_COMMISSION_RATE,
};
pub use geo::{estimate_travel_minutes, haversine_km, Coordinates};
pub use governance::{CommissionProposal, ProposalPatch, ProposalStatus, VoteAction};
pub use ids::{ProposalId, RideId};
pub use ride::{Ride, RideAction, RidePatch, RideStatus};
pub use user::{User, UserPatch, UserRole, INITIAL_RATING};
