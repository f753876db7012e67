//! Deployment attempt model.

use launchpad_core::status::DeploymentStatus;
use launchpad_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `deployments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Deployment {
    pub id: DbId,
    pub launch_id: DbId,
    #[sqlx(try_from = "String")]
    pub status: DeploymentStatus,
    pub deployment_url: Option<String>,
    pub error_details: Option<String>,
    pub started_at: Timestamp,
    /// Set exactly when `status` is terminal.
    pub completed_at: Option<Timestamp>,
}
