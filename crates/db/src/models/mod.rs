//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts

pub mod deployment;
pub mod launch;
pub mod notification;
pub mod voice_log;
pub mod workflow_execution;
