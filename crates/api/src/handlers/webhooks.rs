//! Handlers for the webhook entry points.
//!
//! These keep the `{success, ...}` bodies their callers (the dashboard, the
//! workflow engine, the voice client) expect. Every failure, including a
//! malformed body, is answered with HTTP 500 `{success: false, error}`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use launchpad_core::lifecycle::DeploymentOutcome;
use launchpad_core::types::DbId;
use launchpad_core::voice::ParsedProduct;
use launchpad_db::models::launch::Launch;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, WebhookResult};
use crate::lifecycle::CompletionPayload;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LaunchProductRequest {
    pub launch_id: DbId,
    #[serde(default)]
    pub manual: bool,
}

#[derive(Debug, Serialize)]
pub struct LaunchProductResponse {
    pub success: bool,
    pub message: &'static str,
    pub deployment_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct DeploymentWebhookResponse {
    pub success: bool,
    pub message: &'static str,
    pub status: DeploymentOutcome,
}

#[derive(Debug, Deserialize)]
pub struct VoiceDeployRequest {
    pub voice_input: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VoiceDeployResponse {
    pub success: bool,
    pub launch: Launch,
    pub parsed_data: ParsedProduct,
    pub message: String,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

// ---------------------------------------------------------------------------
// POST /api/launch-product
// ---------------------------------------------------------------------------

/// Start a deployment attempt for an existing launch.
pub async fn launch_product(
    State(state): State<AppState>,
    payload: Result<Json<LaunchProductRequest>, JsonRejection>,
) -> WebhookResult<Json<LaunchProductResponse>> {
    let input = body(payload)?;
    let deployment_id = state
        .lifecycle
        .start_deployment(input.launch_id, input.manual)
        .await?;

    Ok(Json(LaunchProductResponse {
        success: true,
        message: "Launch process initiated",
        deployment_id,
    }))
}

// ---------------------------------------------------------------------------
// POST /api/deployment-webhook
// ---------------------------------------------------------------------------

/// Apply the workflow engine's completion callback.
pub async fn deployment_webhook(
    State(state): State<AppState>,
    payload: Result<Json<CompletionPayload>, JsonRejection>,
) -> WebhookResult<Json<DeploymentWebhookResponse>> {
    let input = body(payload)?;
    let status = state.lifecycle.complete_deployment(&input).await?;

    Ok(Json(DeploymentWebhookResponse {
        success: true,
        message: "Deployment status updated",
        status,
    }))
}

// ---------------------------------------------------------------------------
// POST /api/voice-deploy
// ---------------------------------------------------------------------------

/// Create a launch from a spoken request.
pub async fn voice_deploy(
    State(state): State<AppState>,
    payload: Result<Json<VoiceDeployRequest>, JsonRejection>,
) -> WebhookResult<Json<VoiceDeployResponse>> {
    let input = body(payload)?;
    let created = state
        .voice
        .parse_and_create_launch(&input.voice_input, input.user_id.as_deref())
        .await?;

    let message = format!("Product \"{}\" queued for deployment", created.parsed.product);
    Ok(Json(VoiceDeployResponse {
        success: true,
        launch: created.launch,
        parsed_data: created.parsed,
        message,
    }))
}

// ---------------------------------------------------------------------------
// OPTIONS
// ---------------------------------------------------------------------------

/// Bare preflight answer for clients that send `OPTIONS` without CORS
/// request headers.
pub async fn preflight() -> &'static str {
    "ok"
}
