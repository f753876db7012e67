//! Handlers for the dashboard's launch endpoints.
//!
//! Provides listing, manual submission, per-launch detail (deployments and
//! notification log), and slug availability checks.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use launchpad_core::error::CoreError;
use launchpad_core::launch::{
    require_text, validate_price, validate_product_name, DEFAULT_LAUNCHED_BY,
};
use launchpad_core::naming::launch_slug;
use launchpad_core::types::DbId;
use launchpad_db::models::launch::{CreateLaunch, Launch};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Manual launch submission from the dashboard form.
#[derive(Debug, Deserialize)]
pub struct CreateLaunchRequest {
    pub product_name: String,
    pub description: String,
    pub price: f64,
    pub prompt: String,
    #[serde(default)]
    pub launched_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SlugQuery {
    pub slug: String,
}

#[derive(Debug, Serialize)]
pub struct SlugAvailability {
    pub slug: String,
    pub available: bool,
}

// ---------------------------------------------------------------------------
// GET /launches
// ---------------------------------------------------------------------------

/// List all launches, newest first.
pub async fn list_launches(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let launches = state.store.list_launches().await?;
    Ok(Json(DataResponse { data: launches }))
}

// ---------------------------------------------------------------------------
// POST /launches
// ---------------------------------------------------------------------------

/// Create a `pending` launch from the dashboard form.
///
/// The slug is derived from the product name and must not already exist.
pub async fn create_launch(
    State(state): State<AppState>,
    Json(input): Json<CreateLaunchRequest>,
) -> AppResult<impl IntoResponse> {
    let product_name = validate_product_name(&input.product_name)?;
    let description = require_text("description", &input.description)?;
    let prompt = require_text("prompt", &input.prompt)?;
    let price = validate_price(input.price)?;

    let slug = launch_slug(product_name);
    if slug.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "product_name must contain at least one letter or digit".into(),
        )));
    }
    if state.store.slug_exists(&slug).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "A launch with slug '{slug}' already exists"
        ))));
    }

    let launched_by = input
        .launched_by
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_LAUNCHED_BY);

    let launch = state
        .store
        .create_launch(&CreateLaunch {
            product_name: product_name.to_string(),
            slug,
            description: description.to_string(),
            price,
            prompt: prompt.to_string(),
            launched_by: Some(launched_by.to_string()),
        })
        .await?;

    tracing::info!(launch_id = %launch.id, slug = %launch.slug, "Launch created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: launch })))
}

// ---------------------------------------------------------------------------
// GET /launches/{id}
// ---------------------------------------------------------------------------

pub async fn get_launch(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let launch = find_launch(&state, id).await?;
    Ok(Json(DataResponse { data: launch }))
}

// ---------------------------------------------------------------------------
// GET /launches/{id}/deployments
// ---------------------------------------------------------------------------

/// Deployment attempts for a launch, newest first.
pub async fn list_deployments(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_launch(&state, id).await?;
    let deployments = state.store.list_deployments(id).await?;
    Ok(Json(DataResponse { data: deployments }))
}

// ---------------------------------------------------------------------------
// GET /launches/{id}/notifications
// ---------------------------------------------------------------------------

/// Notification log for a launch, newest first.
pub async fn list_notifications(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_launch(&state, id).await?;
    let notifications = state.store.list_notifications(id).await?;
    Ok(Json(DataResponse { data: notifications }))
}

// ---------------------------------------------------------------------------
// GET /launches/slug-available
// ---------------------------------------------------------------------------

/// Whether `slug` (normalised) is free for a new launch.
pub async fn slug_available(
    State(state): State<AppState>,
    Query(query): Query<SlugQuery>,
) -> AppResult<impl IntoResponse> {
    let slug = launch_slug(&query.slug);
    if slug.is_empty() {
        return Err(AppError::BadRequest("slug must not be empty".into()));
    }
    let available = !state.store.slug_exists(&slug).await?;
    Ok(Json(DataResponse {
        data: SlugAvailability { slug, available },
    }))
}

async fn find_launch(state: &AppState, id: DbId) -> AppResult<Launch> {
    state
        .store
        .find_launch(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Launch",
            id,
        }))
}
