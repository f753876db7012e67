//! Workflow execution audit model.

use launchpad_core::status::ExecutionStatus;
use launchpad_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `workflow_executions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkflowExecution {
    pub id: DbId,
    pub launch_id: DbId,
    /// The deployment attempt this run belongs to.
    pub deployment_id: DbId,
    pub workflow_id: String,
    #[sqlx(try_from = "String")]
    pub status: ExecutionStatus,
    pub webhook_url: Option<String>,
    /// Raw completion callback payload.
    pub response_data: Option<serde_json::Value>,
    pub error_details: Option<String>,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}
