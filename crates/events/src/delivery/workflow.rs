//! Workflow-engine trigger.
//!
//! [`HttpWorkflowTrigger`] posts the launch to the automation engine's
//! webhook. The engine reports the outcome later through the deployment
//! callback; this call only confirms the run was accepted.

use async_trait::async_trait;
use launchpad_core::types::DbId;
use serde::Serialize;

use super::{build_client, check_status, DeliveryError};

/// Header carrying the shared secret the workflow engine checks.
pub const SECRET_HEADER: &str = "X-N8N-SECRET";

/// Body sent to the workflow engine when a deployment starts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowTriggerPayload {
    pub launch_id: DbId,
    pub deployment_id: DbId,
    pub product_name: String,
    pub slug: String,
    pub description: String,
    pub price: f64,
    pub prompt: String,
}

/// Starts a deployment run in the external workflow engine.
#[async_trait]
pub trait WorkflowTrigger: Send + Sync {
    /// The endpoint runs are sent to, recorded on the execution audit row.
    fn webhook_url(&self) -> &str;

    async fn trigger(&self, payload: &WorkflowTriggerPayload) -> Result<(), DeliveryError>;
}

/// [`WorkflowTrigger`] over HTTP.
pub struct HttpWorkflowTrigger {
    client: reqwest::Client,
    url: String,
    secret: Option<String>,
}

impl HttpWorkflowTrigger {
    /// Create a trigger for `url`. Without a secret the header is omitted.
    pub fn new(url: impl Into<String>, secret: Option<String>) -> Result<Self, DeliveryError> {
        let url = url.into();
        if secret.is_none() {
            tracing::warn!(url = %url, "Workflow webhook secret not configured, sending unsigned requests");
        }
        Ok(Self {
            client: build_client()?,
            url,
            secret,
        })
    }

    fn request(&self, payload: &WorkflowTriggerPayload) -> reqwest::RequestBuilder {
        let request = self.client.post(&self.url).json(payload);
        match &self.secret {
            Some(secret) => request.header(SECRET_HEADER, secret),
            None => request,
        }
    }
}

#[async_trait]
impl WorkflowTrigger for HttpWorkflowTrigger {
    fn webhook_url(&self) -> &str {
        &self.url
    }

    async fn trigger(&self, payload: &WorkflowTriggerPayload) -> Result<(), DeliveryError> {
        let response = self.request(payload).send().await?;
        check_status(response).await?;
        tracing::debug!(
            launch_id = %payload.launch_id,
            deployment_id = %payload.deployment_id,
            "Workflow triggered",
        );
        Ok(())
    }
}
