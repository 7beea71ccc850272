//! REST API over the registries and mock collaborators

pub mod extract;
pub mod handlers;
pub mod router;
pub mod state;
