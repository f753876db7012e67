//! Launch entity model and DTOs.

use launchpad_core::status::LaunchStatus;
use launchpad_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `launches` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Launch {
    pub id: DbId,
    pub product_name: String,
    pub slug: String,
    pub description: String,
    pub price: f64,
    pub prompt: String,
    #[sqlx(try_from = "String")]
    pub status: LaunchStatus,
    pub deployed: bool,
    pub subdomain_url: Option<String>,
    pub error_message: Option<String>,
    pub launched_by: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a launch. New launches always start as `pending`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLaunch {
    pub product_name: String,
    pub slug: String,
    pub description: String,
    pub price: f64,
    pub prompt: String,
    pub launched_by: Option<String>,
}
