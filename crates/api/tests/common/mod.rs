//! Shared test harness: an in-memory [`LaunchStore`], recording fakes for the
//! outbound seams, and request helpers.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use launchpad_api::config::ServerConfig;
use launchpad_api::lifecycle::{LifecycleController, VoiceIntake};
use launchpad_api::router::build_app_router;
use launchpad_api::state::AppState;
use launchpad_core::status::{DeliveryStatus, DeploymentStatus, ExecutionStatus, LaunchStatus};
use launchpad_core::types::DbId;
use launchpad_db::models::deployment::Deployment;
use launchpad_db::models::launch::{CreateLaunch, Launch};
use launchpad_db::models::notification::{CreateNotification, Notification};
use launchpad_db::models::voice_log::{CreateVoiceLog, VoiceLog};
use launchpad_db::models::workflow_execution::WorkflowExecution;
use launchpad_db::{CompletionRecord, CompletionResult, LaunchStore, StartRecord, StoreError};
use launchpad_events::{
    DeliveryError, MessageSender, OutboundMessage, WorkflowTrigger, WorkflowTriggerPayload,
};
use launchpad_llm::{CompletionModel, CompletionRequest, LlmError};

pub const WORKFLOW_ID: &str = "deploy-product";
pub const WEBHOOK_URL: &str = "https://hooks.example.com/deploy-product";
pub const OPERATOR: &str = "+2348012345678";

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Tables {
    launches: Vec<Launch>,
    deployments: Vec<Deployment>,
    notifications: Vec<Notification>,
    executions: Vec<WorkflowExecution>,
    voice_logs: Vec<VoiceLog>,
    fail_record_start: bool,
}

/// [`LaunchStore`] over vectors behind one mutex. Every call holds the lock
/// for its whole duration, so multi-row steps are atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Insert a `pending` launch directly.
    pub fn seed_launch(&self, product_name: &str, slug: &str) -> Launch {
        let now = Utc::now();
        let launch = Launch {
            id: Uuid::new_v4(),
            product_name: product_name.to_string(),
            slug: slug.to_string(),
            description: format!("{product_name} description"),
            price: 5000.0,
            prompt: format!("Build {product_name}"),
            status: LaunchStatus::Pending,
            deployed: false,
            subdomain_url: None,
            error_message: None,
            launched_by: Some("admin@odiaaa.com".to_string()),
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().unwrap().launches.push(launch.clone());
        launch
    }

    pub fn launch(&self, id: DbId) -> Launch {
        let tables = self.tables.lock().unwrap();
        tables
            .launches
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .expect("launch exists")
    }

    pub fn deployments_for(&self, launch_id: DbId) -> Vec<Deployment> {
        let tables = self.tables.lock().unwrap();
        tables
            .deployments
            .iter()
            .filter(|d| d.launch_id == launch_id)
            .cloned()
            .collect()
    }

    pub fn notifications_for(&self, launch_id: DbId) -> Vec<Notification> {
        let tables = self.tables.lock().unwrap();
        tables
            .notifications
            .iter()
            .filter(|n| n.launch_id == launch_id)
            .cloned()
            .collect()
    }

    pub fn executions_for(&self, launch_id: DbId) -> Vec<WorkflowExecution> {
        let tables = self.tables.lock().unwrap();
        tables
            .executions
            .iter()
            .filter(|e| e.launch_id == launch_id)
            .cloned()
            .collect()
    }

    pub fn voice_logs(&self) -> Vec<VoiceLog> {
        self.tables.lock().unwrap().voice_logs.clone()
    }

    pub fn launch_count(&self) -> usize {
        self.tables.lock().unwrap().launches.len()
    }

    /// Make every `record_start` fail as if the database dropped the write.
    pub fn fail_record_start(&self) {
        self.tables.lock().unwrap().fail_record_start = true;
    }
}

fn newest_first<T: Clone>(rows: impl Iterator<Item = T>) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.reverse();
    rows
}

fn new_notification(input: &CreateNotification) -> Notification {
    Notification {
        id: Uuid::new_v4(),
        launch_id: input.launch_id,
        channel: input.channel.clone(),
        recipient: input.recipient.clone(),
        message: input.message.clone(),
        status: None,
        sent_at: None,
        error_message: None,
        created_at: Utc::now(),
    }
}

#[async_trait]
impl LaunchStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_launch(&self, id: DbId) -> Result<Option<Launch>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.launches.iter().find(|l| l.id == id).cloned())
    }

    async fn list_launches(&self) -> Result<Vec<Launch>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(newest_first(tables.launches.iter().cloned()))
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.launches.iter().any(|l| l.slug == slug))
    }

    async fn create_launch(&self, input: &CreateLaunch) -> Result<Launch, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.launches.iter().any(|l| l.slug == input.slug) {
            return Err(StoreError::Conflict(format!(
                "Slug '{}' is already taken",
                input.slug
            )));
        }
        let now = Utc::now();
        let launch = Launch {
            id: Uuid::new_v4(),
            product_name: input.product_name.clone(),
            slug: input.slug.clone(),
            description: input.description.clone(),
            price: input.price,
            prompt: input.prompt.clone(),
            status: LaunchStatus::Pending,
            deployed: false,
            subdomain_url: None,
            error_message: None,
            launched_by: input.launched_by.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.launches.push(launch.clone());
        Ok(launch)
    }

    async fn find_deployment(&self, id: DbId) -> Result<Option<Deployment>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.deployments.iter().find(|d| d.id == id).cloned())
    }

    async fn list_deployments(&self, launch_id: DbId) -> Result<Vec<Deployment>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(newest_first(
            tables
                .deployments
                .iter()
                .filter(|d| d.launch_id == launch_id)
                .cloned(),
        ))
    }

    async fn begin_deployment(&self, launch_id: DbId) -> Result<Deployment, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let deployment = Deployment {
            id: Uuid::new_v4(),
            launch_id,
            status: DeploymentStatus::Deploying,
            deployment_url: None,
            error_details: None,
            started_at: Utc::now(),
            completed_at: None,
        };
        tables.deployments.push(deployment.clone());
        Ok(deployment)
    }

    async fn abandon_deployment(
        &self,
        deployment_id: DbId,
        error_details: &str,
    ) -> Result<Deployment, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let deployment = tables
            .deployments
            .iter_mut()
            .find(|d| d.id == deployment_id)
            .ok_or(StoreError::NotFound {
                entity: "Deployment",
                id: deployment_id,
            })?;
        deployment.status = DeploymentStatus::Failed;
        deployment.error_details = Some(error_details.to_string());
        deployment.completed_at = Some(Utc::now());
        Ok(deployment.clone())
    }

    async fn record_start(
        &self,
        record: &StartRecord,
    ) -> Result<(Launch, Notification), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.fail_record_start {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        let launch = tables
            .launches
            .iter_mut()
            .find(|l| l.id == record.launch_id)
            .ok_or(StoreError::NotFound {
                entity: "Launch",
                id: record.launch_id,
            })?;
        launch.status = LaunchStatus::Deploying;
        launch.deployed = false;
        launch.error_message = None;
        launch.updated_at = Utc::now();
        let launch = launch.clone();

        tables.executions.push(WorkflowExecution {
            id: Uuid::new_v4(),
            launch_id: record.launch_id,
            deployment_id: record.deployment_id,
            workflow_id: record.workflow_id.clone(),
            status: ExecutionStatus::Running,
            webhook_url: Some(record.webhook_url.clone()),
            response_data: None,
            error_details: None,
            started_at: Utc::now(),
            completed_at: None,
        });

        let notification = new_notification(&record.notification);
        tables.notifications.push(notification.clone());
        Ok((launch, notification))
    }

    async fn record_completion(
        &self,
        record: &CompletionRecord,
    ) -> Result<CompletionResult, StoreError> {
        let mut tables = self.tables.lock().unwrap();

        let deployment_idx = tables
            .deployments
            .iter()
            .position(|d| d.id == record.deployment_id)
            .ok_or(StoreError::NotFound {
                entity: "Deployment",
                id: record.deployment_id,
            })?;
        let launch_idx = tables
            .launches
            .iter()
            .position(|l| l.id == record.launch_id)
            .ok_or(StoreError::NotFound {
                entity: "Launch",
                id: record.launch_id,
            })?;

        let now = Utc::now();

        let deployment = &mut tables.deployments[deployment_idx];
        deployment.status = record.outcome.deployment_status();
        deployment.deployment_url = record.deployment_url.clone();
        deployment.error_details = record.error_details.clone();
        deployment.completed_at = Some(now);
        let deployment = deployment.clone();

        let update = &record.launch_update;
        let launch = &mut tables.launches[launch_idx];
        launch.status = update.status;
        launch.deployed = update.deployed;
        if update.subdomain_url.is_some() {
            launch.subdomain_url = update.subdomain_url.clone();
        }
        if update.error_message.is_some() {
            launch.error_message = update.error_message.clone();
        }
        launch.updated_at = now;
        let launch = launch.clone();

        let notification = new_notification(&record.notification);
        tables.notifications.push(notification.clone());

        if let Some(execution) = tables
            .executions
            .iter_mut()
            .find(|e| e.deployment_id == record.deployment_id)
        {
            execution.status = record.outcome.execution_status();
            execution.completed_at = Some(now);
            execution.response_data = Some(record.response_data.clone());
            execution.error_details = record.error_details.clone();
        }

        Ok(CompletionResult {
            launch,
            deployment,
            notification,
        })
    }

    async fn mark_notification_sent(&self, id: DbId) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let notification = tables
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(StoreError::NotFound {
                entity: "Notification",
                id,
            })?;
        notification.status = Some(DeliveryStatus::Sent);
        notification.sent_at = Some(Utc::now());
        Ok(())
    }

    async fn mark_notification_failed(&self, id: DbId, error: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let notification = tables
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(StoreError::NotFound {
                entity: "Notification",
                id,
            })?;
        notification.status = Some(DeliveryStatus::Failed);
        notification.error_message = Some(error.to_string());
        Ok(())
    }

    async fn list_notifications(&self, launch_id: DbId) -> Result<Vec<Notification>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(newest_first(
            tables
                .notifications
                .iter()
                .filter(|n| n.launch_id == launch_id)
                .cloned(),
        ))
    }

    async fn find_latest_execution(
        &self,
        launch_id: DbId,
        workflow_id: &str,
    ) -> Result<Option<WorkflowExecution>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .executions
            .iter()
            .rev()
            .find(|e| e.launch_id == launch_id && e.workflow_id == workflow_id)
            .cloned())
    }

    async fn log_voice(&self, input: &CreateVoiceLog) -> Result<VoiceLog, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let log = VoiceLog {
            id: Uuid::new_v4(),
            user_id: input.user_id.clone(),
            message_text: input.message_text.clone(),
            response_text: input.response_text.clone(),
            audio_url: None,
            created_at: Utc::now(),
        };
        tables.voice_logs.push(log.clone());
        Ok(log)
    }
}

// ---------------------------------------------------------------------------
// Outbound fakes
// ---------------------------------------------------------------------------

/// Records trigger calls; answers with an HTTP error when `fail_status` is set.
#[derive(Default)]
pub struct RecordingTrigger {
    pub calls: Mutex<Vec<WorkflowTriggerPayload>>,
    pub fail_status: Option<u16>,
}

#[async_trait]
impl WorkflowTrigger for RecordingTrigger {
    fn webhook_url(&self) -> &str {
        WEBHOOK_URL
    }

    async fn trigger(&self, payload: &WorkflowTriggerPayload) -> Result<(), DeliveryError> {
        self.calls.lock().unwrap().push(payload.clone());
        match self.fail_status {
            Some(status) => Err(DeliveryError::HttpStatus {
                status,
                body: "Bad Gateway".to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Records sent messages; fails every send when `fail` is set.
#[derive(Default)]
pub struct RecordingMessenger {
    pub sent: Mutex<Vec<OutboundMessage>>,
    pub fail: bool,
}

#[async_trait]
impl MessageSender for RecordingMessenger {
    async fn send(&self, message: &OutboundMessage) -> Result<Option<String>, DeliveryError> {
        self.sent.lock().unwrap().push(message.clone());
        if self.fail {
            return Err(DeliveryError::HttpStatus {
                status: 401,
                body: "Authenticate".to_string(),
            });
        }
        Ok(Some("SM123".to_string()))
    }
}

/// Returns a fixed reply and records the requests it saw.
pub struct ScriptedModel {
    pub reply: String,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    fn default_model(&self) -> &str {
        "gpt-4"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.reply.clone())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Knobs for [`build_test_app`].
#[derive(Default)]
pub struct TestOptions {
    /// Configure a messenger (otherwise messaging is disabled).
    pub messaging: bool,
    /// Make every messaging send fail.
    pub messaging_fails: bool,
    /// Make the workflow trigger answer with this HTTP status.
    pub trigger_status: Option<u16>,
    /// Configure a language model that always returns this reply.
    pub model_reply: Option<String>,
}

/// The router plus handles on every fake behind it.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub trigger: Arc<RecordingTrigger>,
    pub messenger: Option<Arc<RecordingMessenger>>,
    pub model: Option<Arc<ScriptedModel>>,
    pub controller: Arc<LifecycleController>,
    pub voice: Arc<VoiceIntake>,
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router over in-memory fakes.
///
/// Uses the same [`build_app_router`] as `main.rs`, so the middleware stack
/// (CORS, request ID, timeout, tracing, panic recovery) is exercised too.
pub fn build_test_app(options: TestOptions) -> TestApp {
    let store = Arc::new(MemoryStore::default());
    let trigger = Arc::new(RecordingTrigger {
        fail_status: options.trigger_status,
        ..Default::default()
    });
    let messenger = options.messaging.then(|| {
        Arc::new(RecordingMessenger {
            fail: options.messaging_fails,
            ..Default::default()
        })
    });
    let model = options
        .model_reply
        .as_deref()
        .map(|reply| Arc::new(ScriptedModel::new(reply)));

    let dyn_store: Arc<dyn LaunchStore> = store.clone();
    let controller = Arc::new(LifecycleController::new(
        Arc::clone(&dyn_store),
        trigger.clone() as Arc<dyn WorkflowTrigger>,
        messenger
            .clone()
            .map(|m| m as Arc<dyn MessageSender>),
        WORKFLOW_ID,
        OPERATOR,
    ));
    let voice = Arc::new(VoiceIntake::new(
        Arc::clone(&dyn_store),
        model.clone().map(|m| m as Arc<dyn CompletionModel>),
    ));

    let config = test_config();
    let state = AppState {
        config: Arc::new(config.clone()),
        store: dyn_store,
        lifecycle: Arc::clone(&controller),
        voice: Arc::clone(&voice),
    };
    let router = build_app_router(state, &config).expect("valid test router");

    TestApp {
        router,
        store,
        trigger,
        messenger,
        model,
        controller,
        voice,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a raw body.
pub async fn post_raw(app: Router, uri: &str, body: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
