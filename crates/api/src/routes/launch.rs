//! Route definitions for dashboard launch endpoints.
//!
//! Mounted at `/launches` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::launch;
use crate::state::AppState;

/// Launch routes.
///
/// ```text
/// GET    /                   -> list_launches
/// POST   /                   -> create_launch
/// GET    /slug-available     -> slug_available
/// GET    /{id}               -> get_launch
/// GET    /{id}/deployments   -> list_deployments
/// GET    /{id}/notifications -> list_notifications
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(launch::list_launches).post(launch::create_launch))
        .route("/slug-available", get(launch::slug_available))
        .route("/{id}", get(launch::get_launch))
        .route("/{id}/deployments", get(launch::list_deployments))
        .route("/{id}/notifications", get(launch::list_notifications))
}
