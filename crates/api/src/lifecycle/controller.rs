use std::sync::Arc;

use launchpad_core::error::CoreError;
use launchpad_core::lifecycle::{
    completion_update, launch_transition, validate_completion, CompletionKind, DeploymentOutcome,
    LifecycleEvent,
};
use launchpad_core::notification::{
    format_notification, LaunchLabel, NotificationEvent, CHANNEL_WHATSAPP,
};
use launchpad_core::status::DeploymentStatus;
use launchpad_core::types::DbId;
use launchpad_db::models::deployment::Deployment;
use launchpad_db::models::launch::Launch;
use launchpad_db::models::notification::{CreateNotification, Notification};
use launchpad_db::{CompletionRecord, LaunchStore, StartRecord};
use launchpad_events::{MessageSender, OutboundMessage, WorkflowTrigger, WorkflowTriggerPayload};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// Service name used in external-call errors for the workflow engine.
const WORKFLOW_SERVICE: &str = "workflow";

/// Completion callback body sent by the workflow engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionPayload {
    pub deployment_id: DbId,
    pub launch_id: DbId,
    pub status: DeploymentOutcome,
    #[serde(default)]
    pub deployment_url: Option<String>,
    #[serde(default)]
    pub error_details: Option<String>,
    /// Any other fields the engine sends (e.g. `vercel_deployment_id`),
    /// kept for the execution audit record.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Coordinates deployment attempts for launches.
///
/// Owns the outbound seams; all persistence goes through the [`LaunchStore`].
pub struct LifecycleController {
    store: Arc<dyn LaunchStore>,
    trigger: Arc<dyn WorkflowTrigger>,
    messenger: Option<Arc<dyn MessageSender>>,
    workflow_id: String,
    operator_recipient: String,
}

impl LifecycleController {
    pub fn new(
        store: Arc<dyn LaunchStore>,
        trigger: Arc<dyn WorkflowTrigger>,
        messenger: Option<Arc<dyn MessageSender>>,
        workflow_id: impl Into<String>,
        operator_recipient: impl Into<String>,
    ) -> Self {
        Self {
            store,
            trigger,
            messenger,
            workflow_id: workflow_id.into(),
            operator_recipient: operator_recipient.into(),
        }
    }

    // -----------------------------------------------------------------------
    // Start
    // -----------------------------------------------------------------------

    /// Start a deployment attempt for a launch and return its deployment id.
    ///
    /// The deployment row is created before the workflow engine is called.
    /// If the call fails the deployment is closed as `failed` and the launch
    /// is left as it was. A launch whose latest deployment is still
    /// `deploying` cannot be started again.
    pub async fn start_deployment(&self, launch_id: DbId, manual: bool) -> AppResult<DbId> {
        let launch = self.load_launch(launch_id).await?;
        launch_transition(launch.status, LifecycleEvent::Start)?;
        if let Some(latest) = self.latest_deployment(launch.id).await? {
            if latest.status == DeploymentStatus::Deploying {
                return Err(CoreError::Conflict(format!(
                    "Deployment {} is already in progress for this launch",
                    latest.id
                ))
                .into());
            }
        }

        tracing::info!(launch_id = %launch.id, slug = %launch.slug, manual, "Starting deployment");

        let deployment = self.store.begin_deployment(launch.id).await?;

        let payload = WorkflowTriggerPayload {
            launch_id: launch.id,
            deployment_id: deployment.id,
            product_name: launch.product_name.clone(),
            slug: launch.slug.clone(),
            description: launch.description.clone(),
            price: launch.price,
            prompt: launch.prompt.clone(),
        };

        if let Err(e) = self.trigger.trigger(&payload).await {
            let message = e.to_string();
            tracing::error!(
                launch_id = %launch.id,
                deployment_id = %deployment.id,
                error = %message,
                "Workflow trigger failed",
            );
            if let Err(close_err) = self
                .store
                .abandon_deployment(deployment.id, &message)
                .await
            {
                tracing::error!(
                    deployment_id = %deployment.id,
                    error = %close_err,
                    "Failed to close deployment after trigger failure",
                );
            }
            return Err(CoreError::ExternalCall {
                service: WORKFLOW_SERVICE,
                message,
            }
            .into());
        }

        let message = format_notification(label(&launch), NotificationEvent::Started);
        let record = StartRecord {
            launch_id: launch.id,
            deployment_id: deployment.id,
            workflow_id: self.workflow_id.clone(),
            webhook_url: self.trigger.webhook_url().to_string(),
            notification: self.notification(launch.id, message),
        };
        let (launch, _) = match self.store.record_start(&record).await {
            Ok(recorded) => recorded,
            Err(e) => {
                // The engine already has the job; its callback still completes
                // this deployment.
                tracing::error!(
                    launch_id = %launch.id,
                    deployment_id = %deployment.id,
                    error = %e,
                    "Failed to record deployment start",
                );
                return Err(e.into());
            }
        };

        tracing::info!(
            launch_id = %launch.id,
            deployment_id = %deployment.id,
            status = %launch.status,
            "Deployment started",
        );
        Ok(deployment.id)
    }

    // -----------------------------------------------------------------------
    // Completion
    // -----------------------------------------------------------------------

    /// Apply a completion callback and return the reported outcome.
    ///
    /// A callback identical to one already applied is re-applied (and the
    /// notification re-sent). Contradicting callbacks, and any callback for a
    /// deployment that is no longer the launch's latest, are rejected as
    /// conflicts.
    pub async fn complete_deployment(
        &self,
        payload: &CompletionPayload,
    ) -> AppResult<DeploymentOutcome> {
        let deployment = self
            .store
            .find_deployment(payload.deployment_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Deployment",
                id: payload.deployment_id,
            })?;

        if deployment.launch_id != payload.launch_id {
            return Err(CoreError::Validation(format!(
                "Deployment {} does not belong to launch {}",
                deployment.id, payload.launch_id
            ))
            .into());
        }

        let launch = self.load_launch(payload.launch_id).await?;
        let outcome = payload.status;
        let latest = self
            .latest_deployment(launch.id)
            .await?
            .is_some_and(|d| d.id == deployment.id);
        let kind = validate_completion(launch.status, deployment.status, latest, outcome)?;
        if kind == CompletionKind::Replay {
            tracing::info!(
                launch_id = %launch.id,
                deployment_id = %deployment.id,
                status = outcome.as_str(),
                "Re-applying duplicate completion callback",
            );
        }

        let deployment_url = payload.deployment_url.as_deref();
        let error_details = payload.error_details.as_deref();
        let event = match outcome {
            DeploymentOutcome::Success => NotificationEvent::Succeeded { deployment_url },
            DeploymentOutcome::Failed => NotificationEvent::Failed { error_details },
        };
        let message = format_notification(label(&launch), event);

        let record = CompletionRecord {
            launch_id: launch.id,
            deployment_id: deployment.id,
            outcome,
            deployment_url: payload.deployment_url.clone(),
            error_details: payload.error_details.clone(),
            launch_update: completion_update(outcome, deployment_url, error_details),
            response_data: serde_json::to_value(payload)
                .map_err(|e| CoreError::Internal(format!("Failed to encode callback: {e}")))?,
            notification: self.notification(launch.id, message),
        };
        let result = self.store.record_completion(&record).await?;

        tracing::info!(
            launch_id = %result.launch.id,
            deployment_id = %result.deployment.id,
            status = %result.launch.status,
            "Deployment completed",
        );

        self.deliver(&result.notification).await;
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn load_launch(&self, launch_id: DbId) -> AppResult<Launch> {
        Ok(self
            .store
            .find_launch(launch_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Launch",
                id: launch_id,
            })?)
    }

    async fn latest_deployment(&self, launch_id: DbId) -> AppResult<Option<Deployment>> {
        Ok(self.store.list_deployments(launch_id).await?.into_iter().next())
    }

    fn notification(&self, launch_id: DbId, message: String) -> CreateNotification {
        CreateNotification {
            launch_id,
            channel: CHANNEL_WHATSAPP.to_string(),
            recipient: self.operator_recipient.clone(),
            message,
        }
    }

    /// Send a logged notification and record the delivery result.
    ///
    /// Failures here never fail the caller.
    async fn deliver(&self, notification: &Notification) {
        let Some(messenger) = &self.messenger else {
            tracing::debug!(
                notification_id = %notification.id,
                "Messaging not configured, notification left unsent",
            );
            return;
        };

        let message = OutboundMessage {
            to: notification.recipient.clone(),
            body: notification.message.clone(),
        };

        let recorded = match messenger.send(&message).await {
            Ok(sid) => {
                tracing::info!(notification_id = %notification.id, sid = ?sid, "Notification sent");
                self.store.mark_notification_sent(notification.id).await
            }
            Err(e) => {
                tracing::warn!(
                    notification_id = %notification.id,
                    error = %e,
                    "Notification send failed",
                );
                self.store
                    .mark_notification_failed(notification.id, &e.to_string())
                    .await
            }
        };

        if let Err(e) = recorded {
            tracing::error!(
                notification_id = %notification.id,
                error = %e,
                "Failed to record notification delivery status",
            );
        }
    }
}

fn label(launch: &Launch) -> LaunchLabel<'_> {
    LaunchLabel {
        product_name: &launch.product_name,
        slug: &launch.slug,
    }
}
