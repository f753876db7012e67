//! Tests for `AppError` and `WebhookError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly; no router is involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use launchpad_api::error::{AppError, WebhookError};
use launchpad_core::error::CoreError;
use launchpad_db::StoreError;
use uuid::Uuid;

async fn to_parts(response: axum::response::Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let id = Uuid::nil();
    let err = AppError::Core(CoreError::NotFound {
        entity: "Launch",
        id,
    });

    let (status, json) = to_parts(err.into_response()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], format!("Launch with id {id} not found"));
}

#[tokio::test]
async fn conflict_error_returns_409() {
    let err = AppError::Core(CoreError::Conflict("Launch is already live".into()));

    let (status, json) = to_parts(err.into_response()).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["error"], "Launch is already live");
}

#[tokio::test]
async fn store_conflict_returns_409() {
    let err = AppError::Store(StoreError::Conflict("Slug 'crm-pro' is already taken".into()));

    let (status, json) = to_parts(err.into_response()).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "Slug 'crm-pro' is already taken");
}

#[tokio::test]
async fn external_call_error_returns_502() {
    let err = AppError::Core(CoreError::ExternalCall {
        service: "workflow",
        message: "Remote returned HTTP 502: Bad Gateway".into(),
    });

    let (status, json) = to_parts(err.into_response()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["code"], "EXTERNAL_CALL_FAILED");
}

#[tokio::test]
async fn database_error_is_sanitized() {
    let err = AppError::Store(StoreError::Database(sqlx::Error::PoolTimedOut));

    let (status, json) = to_parts(err.into_response()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("secret database credentials leaked".into());

    let (status, json) = to_parts(err.into_response()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// WebhookError
// ---------------------------------------------------------------------------

#[tokio::test]
async fn webhook_error_is_always_500_with_envelope() {
    let err = WebhookError(AppError::Core(CoreError::Validation(
        "voice_input must not be empty".into(),
    )));

    let (status, json) = to_parts(err.into_response()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "voice_input must not be empty");
}

#[tokio::test]
async fn webhook_error_sanitizes_database_details() {
    let err = WebhookError(AppError::Store(StoreError::Database(
        sqlx::Error::Protocol("password=hunter2".into()),
    )));

    let (_, json) = to_parts(err.into_response()).await;

    assert_eq!(json["error"], "An internal error occurred");
}
