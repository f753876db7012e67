//! Route definitions for the webhook entry points.
//!
//! Mounted at `/api` by the app router.

use axum::routing::post;
use axum::Router;

use crate::handlers::webhooks;
use crate::state::AppState;

/// Webhook routes.
///
/// ```text
/// POST   /launch-product      -> launch_product
/// POST   /deployment-webhook  -> deployment_webhook
/// POST   /voice-deploy        -> voice_deploy
/// ```
///
/// Each also answers a bare `OPTIONS` with 200.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/launch-product",
            post(webhooks::launch_product).options(webhooks::preflight),
        )
        .route(
            "/deployment-webhook",
            post(webhooks::deployment_webhook).options(webhooks::preflight),
        )
        .route(
            "/voice-deploy",
            post(webhooks::voice_deploy).options(webhooks::preflight),
        )
}
