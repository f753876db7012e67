//! Notification log model and DTOs.

use launchpad_core::status::DeliveryStatus;
use launchpad_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

/// A row from the `notifications` table.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub launch_id: DbId,
    pub channel: String,
    pub recipient: String,
    pub message: String,
    /// `NULL` until a send is attempted; then `sent` or `failed`.
    pub status: Option<DeliveryStatus>,
    pub sent_at: Option<Timestamp>,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
}

// Written by hand: `#[sqlx(try_from)]` cannot convert a nullable column.
impl<'r> FromRow<'r, PgRow> for Notification {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let status = row
            .try_get::<Option<String>, _>("status")?
            .map(DeliveryStatus::try_from)
            .transpose()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            id: row.try_get("id")?,
            launch_id: row.try_get("launch_id")?,
            channel: row.try_get("channel")?,
            recipient: row.try_get("recipient")?,
            message: row.try_get("message")?,
            status,
            sent_at: row.try_get("sent_at")?,
            error_message: row.try_get("error_message")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// DTO for inserting a notification.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNotification {
    pub launch_id: DbId,
    pub channel: String,
    pub recipient: String,
    pub message: String,
}
