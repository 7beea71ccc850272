//! API layer for rideshift-daemon

pub mod rest;

pub use rest::router::create_router;
