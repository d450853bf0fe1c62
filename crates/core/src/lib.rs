//! Pure domain logic for Folio: identifiers, errors, story structure,
//! versioning helpers and the interfaces of external collaborators.
//!
//! Nothing in this crate performs I/O.

pub mod branching;
pub mod collaborators;
pub mod error;
pub mod pull_request;
pub mod story;
pub mod types;
pub mod versioning;
