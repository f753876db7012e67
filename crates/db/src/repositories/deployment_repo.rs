//! Repository for the `deployments` table.

use launchpad_core::status::DeploymentStatus;
use launchpad_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::deployment::Deployment;

/// Column list for `deployments` queries.
const COLUMNS: &str =
    "id, launch_id, status, deployment_url, error_details, started_at, completed_at";

/// Provides CRUD operations for deployment attempts.
pub struct DeploymentRepo;

impl DeploymentRepo {
    /// Insert a deployment attempt in `deploying` status.
    pub async fn create<'e, E>(executor: E, launch_id: DbId) -> Result<Deployment, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO deployments (launch_id, status) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Deployment>(&query)
            .bind(launch_id)
            .bind(DeploymentStatus::Deploying.as_str())
            .fetch_one(executor)
            .await
    }

    /// Find a deployment by ID.
    pub async fn find_by_id<'e, E>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Deployment>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM deployments WHERE id = $1");
        sqlx::query_as::<_, Deployment>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List deployments for a launch, newest first.
    pub async fn list_for_launch<'e, E>(
        executor: E,
        launch_id: DbId,
    ) -> Result<Vec<Deployment>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM deployments \
             WHERE launch_id = $1 \
             ORDER BY started_at DESC"
        );
        sqlx::query_as::<_, Deployment>(&query)
            .bind(launch_id)
            .fetch_all(executor)
            .await
    }

    /// Record a terminal status. Sets `completed_at` to now.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn complete<'e, E>(
        executor: E,
        id: DbId,
        status: DeploymentStatus,
        deployment_url: Option<&str>,
        error_details: Option<&str>,
    ) -> Result<Option<Deployment>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE deployments SET \
                status = $2, deployment_url = $3, error_details = $4, completed_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Deployment>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(deployment_url)
            .bind(error_details)
            .fetch_optional(executor)
            .await
    }
}
