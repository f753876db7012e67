//! The store surface the lifecycle controller depends on.
//!
//! [`LaunchStore`] groups the reads and writes of one lifecycle step behind a
//! single call. [`PgLaunchStore`] runs each multi-row step inside one
//! transaction, so a failure part-way leaves no partial state behind.

use async_trait::async_trait;
use launchpad_core::lifecycle::{DeploymentOutcome, LaunchUpdate};
use launchpad_core::types::DbId;

use crate::error::{unique_violation, StoreError};
use crate::models::deployment::Deployment;
use crate::models::launch::{CreateLaunch, Launch};
use crate::models::notification::{CreateNotification, Notification};
use crate::models::voice_log::{CreateVoiceLog, VoiceLog};
use crate::models::workflow_execution::WorkflowExecution;
use crate::repositories::{
    DeploymentRepo, LaunchRepo, NotificationRepo, VoiceLogRepo, WorkflowExecutionRepo,
};
use crate::DbPool;

// ---------------------------------------------------------------------------
// Step inputs and outputs
// ---------------------------------------------------------------------------

/// Writes that make up a successful start: the launch moves to `deploying`,
/// a `running` execution is recorded, and the "started" notification logged.
#[derive(Debug, Clone)]
pub struct StartRecord {
    pub launch_id: DbId,
    pub deployment_id: DbId,
    pub workflow_id: String,
    pub webhook_url: String,
    pub notification: CreateNotification,
}

/// Writes that make up a completion callback.
#[derive(Debug, Clone)]
pub struct CompletionRecord {
    pub launch_id: DbId,
    pub deployment_id: DbId,
    pub outcome: DeploymentOutcome,
    pub deployment_url: Option<String>,
    pub error_details: Option<String>,
    pub launch_update: LaunchUpdate,
    /// Raw callback payload, kept on the execution record.
    pub response_data: serde_json::Value,
    pub notification: CreateNotification,
}

/// Rows as they stand after a completion was recorded.
#[derive(Debug, Clone)]
pub struct CompletionResult {
    pub launch: Launch,
    pub deployment: Deployment,
    pub notification: Notification,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait LaunchStore: Send + Sync {
    /// Round-trip to the backing store.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn find_launch(&self, id: DbId) -> Result<Option<Launch>, StoreError>;

    /// All launches, newest first.
    async fn list_launches(&self) -> Result<Vec<Launch>, StoreError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, StoreError>;

    /// Insert a `pending` launch. A taken slug is [`StoreError::Conflict`].
    async fn create_launch(&self, input: &CreateLaunch) -> Result<Launch, StoreError>;

    async fn find_deployment(&self, id: DbId) -> Result<Option<Deployment>, StoreError>;

    /// Deployment attempts for a launch, newest first.
    async fn list_deployments(&self, launch_id: DbId) -> Result<Vec<Deployment>, StoreError>;

    /// Insert a `deploying` deployment for a launch.
    async fn begin_deployment(&self, launch_id: DbId) -> Result<Deployment, StoreError>;

    /// Close a deployment whose trigger call failed.
    async fn abandon_deployment(
        &self,
        deployment_id: DbId,
        error_details: &str,
    ) -> Result<Deployment, StoreError>;

    /// Apply the writes of a successful start atomically.
    async fn record_start(
        &self,
        record: &StartRecord,
    ) -> Result<(Launch, Notification), StoreError>;

    /// Apply the writes of a completion callback atomically.
    async fn record_completion(
        &self,
        record: &CompletionRecord,
    ) -> Result<CompletionResult, StoreError>;

    async fn mark_notification_sent(&self, id: DbId) -> Result<(), StoreError>;

    async fn mark_notification_failed(&self, id: DbId, error: &str) -> Result<(), StoreError>;

    /// Notification log for a launch, newest first.
    async fn list_notifications(&self, launch_id: DbId) -> Result<Vec<Notification>, StoreError>;

    async fn find_latest_execution(
        &self,
        launch_id: DbId,
        workflow_id: &str,
    ) -> Result<Option<WorkflowExecution>, StoreError>;

    async fn log_voice(&self, input: &CreateVoiceLog) -> Result<VoiceLog, StoreError>;
}

// ---------------------------------------------------------------------------
// Postgres implementation
// ---------------------------------------------------------------------------

/// [`LaunchStore`] backed by a Postgres pool.
#[derive(Clone)]
pub struct PgLaunchStore {
    pool: DbPool,
}

impl PgLaunchStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LaunchStore for PgLaunchStore {
    async fn ping(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn find_launch(&self, id: DbId) -> Result<Option<Launch>, StoreError> {
        Ok(LaunchRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_launches(&self) -> Result<Vec<Launch>, StoreError> {
        Ok(LaunchRepo::list(&self.pool).await?)
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, StoreError> {
        Ok(LaunchRepo::slug_exists(&self.pool, slug).await?)
    }

    async fn create_launch(&self, input: &CreateLaunch) -> Result<Launch, StoreError> {
        LaunchRepo::create(&self.pool, input).await.map_err(|e| {
            match unique_violation(&e) {
                Some(constraint) if constraint == "uq_launches_slug" => {
                    StoreError::Conflict(format!("Slug '{}' is already taken", input.slug))
                }
                Some(constraint) => {
                    StoreError::Conflict(format!("Unique constraint '{constraint}' violated"))
                }
                None => StoreError::Database(e),
            }
        })
    }

    async fn find_deployment(&self, id: DbId) -> Result<Option<Deployment>, StoreError> {
        Ok(DeploymentRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_deployments(&self, launch_id: DbId) -> Result<Vec<Deployment>, StoreError> {
        Ok(DeploymentRepo::list_for_launch(&self.pool, launch_id).await?)
    }

    async fn begin_deployment(&self, launch_id: DbId) -> Result<Deployment, StoreError> {
        Ok(DeploymentRepo::create(&self.pool, launch_id).await?)
    }

    async fn abandon_deployment(
        &self,
        deployment_id: DbId,
        error_details: &str,
    ) -> Result<Deployment, StoreError> {
        DeploymentRepo::complete(
            &self.pool,
            deployment_id,
            DeploymentOutcome::Failed.deployment_status(),
            None,
            Some(error_details),
        )
        .await?
        .ok_or(StoreError::NotFound {
            entity: "Deployment",
            id: deployment_id,
        })
    }

    async fn record_start(
        &self,
        record: &StartRecord,
    ) -> Result<(Launch, Notification), StoreError> {
        let mut tx = self.pool.begin().await?;

        let launch = LaunchRepo::mark_deploying(&mut *tx, record.launch_id)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "Launch",
                id: record.launch_id,
            })?;

        WorkflowExecutionRepo::create(
            &mut *tx,
            record.launch_id,
            record.deployment_id,
            &record.workflow_id,
            &record.webhook_url,
        )
        .await?;

        let notification = NotificationRepo::create(&mut *tx, &record.notification).await?;

        tx.commit().await?;

        tracing::debug!(launch_id = %launch.id, "Start recorded");
        Ok((launch, notification))
    }

    async fn record_completion(
        &self,
        record: &CompletionRecord,
    ) -> Result<CompletionResult, StoreError> {
        let mut tx = self.pool.begin().await?;

        let deployment = DeploymentRepo::complete(
            &mut *tx,
            record.deployment_id,
            record.outcome.deployment_status(),
            record.deployment_url.as_deref(),
            record.error_details.as_deref(),
        )
        .await?
        .ok_or(StoreError::NotFound {
            entity: "Deployment",
            id: record.deployment_id,
        })?;

        let launch = LaunchRepo::apply_update(&mut *tx, record.launch_id, &record.launch_update)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "Launch",
                id: record.launch_id,
            })?;

        let notification = NotificationRepo::create(&mut *tx, &record.notification).await?;

        let executions = WorkflowExecutionRepo::complete_for_deployment(
            &mut *tx,
            record.deployment_id,
            record.outcome.execution_status(),
            &record.response_data,
            record.error_details.as_deref(),
        )
        .await?;

        tx.commit().await?;

        if executions == 0 {
            tracing::warn!(
                launch_id = %record.launch_id,
                deployment_id = %record.deployment_id,
                "No workflow execution found to complete",
            );
        }

        Ok(CompletionResult {
            launch,
            deployment,
            notification,
        })
    }

    async fn mark_notification_sent(&self, id: DbId) -> Result<(), StoreError> {
        if NotificationRepo::mark_sent(&self.pool, id).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound {
                entity: "Notification",
                id,
            })
        }
    }

    async fn mark_notification_failed(&self, id: DbId, error: &str) -> Result<(), StoreError> {
        if NotificationRepo::mark_failed(&self.pool, id, error).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound {
                entity: "Notification",
                id,
            })
        }
    }

    async fn list_notifications(&self, launch_id: DbId) -> Result<Vec<Notification>, StoreError> {
        Ok(NotificationRepo::list_for_launch(&self.pool, launch_id).await?)
    }

    async fn find_latest_execution(
        &self,
        launch_id: DbId,
        workflow_id: &str,
    ) -> Result<Option<WorkflowExecution>, StoreError> {
        Ok(WorkflowExecutionRepo::find_latest(&self.pool, launch_id, workflow_id).await?)
    }

    async fn log_voice(&self, input: &CreateVoiceLog) -> Result<VoiceLog, StoreError> {
        Ok(VoiceLogRepo::create(&self.pool, input).await?)
    }
}
