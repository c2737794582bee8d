//! Electricity data API mock server library.
//!
//! This module exposes the internal modules for testing purposes.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod static_files;

pub use routes::build_router;
pub use state::AppState;
