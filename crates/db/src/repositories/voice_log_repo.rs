//! Repository for the `voice_logs` table.

use sqlx::PgExecutor;

use crate::models::voice_log::{CreateVoiceLog, VoiceLog};

/// Column list for `voice_logs` queries.
const COLUMNS: &str = "id, user_id, message_text, response_text, audio_url, created_at";

/// Provides inserts for the voice interaction audit log.
pub struct VoiceLogRepo;

impl VoiceLogRepo {
    /// Record a voice interaction.
    pub async fn create<'e, E>(executor: E, input: &CreateVoiceLog) -> Result<VoiceLog, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO voice_logs (user_id, message_text, response_text) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VoiceLog>(&query)
            .bind(&input.user_id)
            .bind(&input.message_text)
            .bind(&input.response_text)
            .fetch_one(executor)
            .await
    }
}
