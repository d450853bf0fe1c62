//! Folio API server library.
//!
//! Exposes configuration, state and the router builder so integration tests
//! and the binary entrypoint share them.

pub mod config;
pub mod router;
pub mod routes;
pub mod state;
