//! Repository for the `notifications` table.

use launchpad_core::status::DeliveryStatus;
use launchpad_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::notification::{CreateNotification, Notification};

/// Column list for `notifications` queries.
const COLUMNS: &str =
    "id, launch_id, channel, recipient, message, status, sent_at, error_message, created_at";

/// Provides CRUD operations for the outbound notification log.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert a notification with its delivery status unset.
    pub async fn create<'e, E>(
        executor: E,
        input: &CreateNotification,
    ) -> Result<Notification, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO notifications (launch_id, channel, recipient, message) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(input.launch_id)
            .bind(&input.channel)
            .bind(&input.recipient)
            .bind(&input.message)
            .fetch_one(executor)
            .await
    }

    /// List notifications for a launch, newest first.
    pub async fn list_for_launch<'e, E>(
        executor: E,
        launch_id: DbId,
    ) -> Result<Vec<Notification>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE launch_id = $1 \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(launch_id)
            .fetch_all(executor)
            .await
    }

    /// Mark a notification as sent.
    ///
    /// Returns `true` if the notification exists.
    pub async fn mark_sent<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE notifications \
             SET status = $2, sent_at = NOW(), error_message = NULL \
             WHERE id = $1",
        )
        .bind(id)
        .bind(DeliveryStatus::Sent.as_str())
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a notification as failed with the provider's error.
    ///
    /// Returns `true` if the notification exists.
    pub async fn mark_failed<'e, E>(
        executor: E,
        id: DbId,
        error_message: &str,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE notifications \
             SET status = $2, error_message = $3 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(DeliveryStatus::Failed.as_str())
        .bind(error_message)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
