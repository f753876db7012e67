//! Voice interaction audit log.

use launchpad_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `voice_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VoiceLog {
    pub id: DbId,
    pub user_id: Option<String>,
    pub message_text: String,
    pub response_text: String,
    pub audio_url: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for recording a voice interaction.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVoiceLog {
    pub user_id: Option<String>,
    pub message_text: String,
    pub response_text: String,
}
