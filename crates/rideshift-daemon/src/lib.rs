//! RideShift Daemon library
//!
//! This module provides the core components for the RideShift daemon:
//! - REST API handlers
//! - Storage backends
//! - Configuration
//! - Server lifecycle management

pub mod api;
pub mod config;
pub mod error;
pub mod server;
pub mod storage;

pub use api::rest::state::AppState;
pub use config::DaemonConfig;
pub use error::{ApiError, DaemonError, StorageError};
pub use server::Server;
pub use storage::{InMemoryStorage, Storage};
