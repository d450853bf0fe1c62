//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Where the entity is mutable, an update DTO with `Option` fields

pub mod branch;
pub mod commit;
pub mod pull_request;
pub mod repository;
pub mod scene_version;
pub mod story;
