//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods that
//! accept any Postgres executor as the first argument, so the same method
//! runs against the pool or inside a transaction (`&mut *tx`).

pub mod deployment_repo;
pub mod launch_repo;
pub mod notification_repo;
pub mod voice_log_repo;
pub mod workflow_execution_repo;

pub use deployment_repo::DeploymentRepo;
pub use launch_repo::LaunchRepo;
pub use notification_repo::NotificationRepo;
pub use voice_log_repo::VoiceLogRepo;
pub use workflow_execution_repo::WorkflowExecutionRepo;
