//! Repository for the `launches` table.

use launchpad_core::lifecycle::LaunchUpdate;
use launchpad_core::status::LaunchStatus;
use launchpad_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::launch::{CreateLaunch, Launch};

/// Column list for `launches` queries.
const COLUMNS: &str = "id, product_name, slug, description, price, prompt, status, deployed, \
    subdomain_url, error_message, launched_by, created_at, updated_at";

/// Provides CRUD operations and lifecycle updates for launches.
pub struct LaunchRepo;

impl LaunchRepo {
    /// Insert a new launch in `pending` status.
    pub async fn create<'e, E>(executor: E, input: &CreateLaunch) -> Result<Launch, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO launches \
                (product_name, slug, description, price, prompt, launched_by, status, deployed) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, false) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Launch>(&query)
            .bind(&input.product_name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(input.price)
            .bind(&input.prompt)
            .bind(&input.launched_by)
            .bind(LaunchStatus::Pending.as_str())
            .fetch_one(executor)
            .await
    }

    /// Find a launch by ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Launch>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM launches WHERE id = $1");
        sqlx::query_as::<_, Launch>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Whether any launch already uses `slug`.
    pub async fn slug_exists<'e, E>(executor: E, slug: &str) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM launches WHERE slug = $1)")
            .bind(slug)
            .fetch_one(executor)
            .await
    }

    /// List all launches, newest first.
    pub async fn list<'e, E>(executor: E) -> Result<Vec<Launch>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM launches ORDER BY created_at DESC");
        sqlx::query_as::<_, Launch>(&query)
            .fetch_all(executor)
            .await
    }

    /// Move a launch to `deploying` and clear the previous attempt's error.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn mark_deploying<'e, E>(executor: E, id: DbId) -> Result<Option<Launch>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE launches SET \
                status = $2, deployed = false, error_message = NULL, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Launch>(&query)
            .bind(id)
            .bind(LaunchStatus::Deploying.as_str())
            .fetch_optional(executor)
            .await
    }

    /// Apply a completion update. `None` fields of the update leave the
    /// stored value unchanged.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn apply_update<'e, E>(
        executor: E,
        id: DbId,
        update: &LaunchUpdate,
    ) -> Result<Option<Launch>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE launches SET \
                status = $2, \
                deployed = $3, \
                subdomain_url = COALESCE($4, subdomain_url), \
                error_message = COALESCE($5, error_message), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Launch>(&query)
            .bind(id)
            .bind(update.status.as_str())
            .bind(update.deployed)
            .bind(&update.subdomain_url)
            .bind(&update.error_message)
            .fetch_optional(executor)
            .await
    }
}
