pub mod health;
pub mod launch;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /launches                                   list, create
/// /launches/slug-available?slug=              slug availability
/// /launches/{id}                              get
/// /launches/{id}/deployments                  deployment attempts
/// /launches/{id}/notifications                notification log
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/launches", launch::router())
}
