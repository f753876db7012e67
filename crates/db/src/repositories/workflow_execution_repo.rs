//! Repository for the `workflow_executions` table.

use launchpad_core::status::ExecutionStatus;
use launchpad_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::workflow_execution::WorkflowExecution;

/// Column list for `workflow_executions` queries.
const COLUMNS: &str = "id, launch_id, deployment_id, workflow_id, status, webhook_url, \
    response_data, error_details, started_at, completed_at";

/// Provides CRUD operations for workflow execution audit records.
pub struct WorkflowExecutionRepo;

impl WorkflowExecutionRepo {
    /// Insert a `running` execution record.
    pub async fn create<'e, E>(
        executor: E,
        launch_id: DbId,
        deployment_id: DbId,
        workflow_id: &str,
        webhook_url: &str,
    ) -> Result<WorkflowExecution, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO workflow_executions \
                (launch_id, deployment_id, workflow_id, status, webhook_url) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkflowExecution>(&query)
            .bind(launch_id)
            .bind(deployment_id)
            .bind(workflow_id)
            .bind(ExecutionStatus::Running.as_str())
            .bind(webhook_url)
            .fetch_one(executor)
            .await
    }

    /// Find the most recent execution of `workflow_id` for a launch.
    pub async fn find_latest<'e, E>(
        executor: E,
        launch_id: DbId,
        workflow_id: &str,
    ) -> Result<Option<WorkflowExecution>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM workflow_executions \
             WHERE launch_id = $1 AND workflow_id = $2 \
             ORDER BY started_at DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, WorkflowExecution>(&query)
            .bind(launch_id)
            .bind(workflow_id)
            .fetch_optional(executor)
            .await
    }

    /// Close the execution started for a deployment attempt.
    ///
    /// Returns the number of rows updated (0 when the attempt's start was
    /// never recorded).
    pub async fn complete_for_deployment<'e, E>(
        executor: E,
        deployment_id: DbId,
        status: ExecutionStatus,
        response_data: &serde_json::Value,
        error_details: Option<&str>,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE workflow_executions SET \
                status = $2, completed_at = NOW(), response_data = $3, error_details = $4 \
             WHERE deployment_id = $1",
        )
        .bind(deployment_id)
        .bind(status.as_str())
        .bind(response_data)
        .bind(error_details)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
