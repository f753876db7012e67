//! Voice-to-launch intake.

use std::sync::Arc;

use launchpad_core::error::CoreError;
use launchpad_core::launch::{require_text, VOICE_LAUNCHED_BY};
use launchpad_core::voice::{
    parse_product_reply, ParsedProduct, VOICE_MAX_TOKENS, VOICE_SYSTEM_PROMPT, VOICE_TEMPERATURE,
};
use launchpad_db::models::launch::{CreateLaunch, Launch};
use launchpad_db::models::voice_log::CreateVoiceLog;
use launchpad_db::LaunchStore;
use launchpad_llm::{ChatMessage, CompletionModel, CompletionRequest};

use crate::error::AppResult;

const LLM_SERVICE: &str = "openai";

/// A launch created from a voice request, with the data the model extracted.
#[derive(Debug, Clone)]
pub struct VoiceLaunch {
    pub launch: Launch,
    pub parsed: ParsedProduct,
}

/// Turns free-form spoken requests into `pending` launches.
pub struct VoiceIntake {
    store: Arc<dyn LaunchStore>,
    model: Option<Arc<dyn CompletionModel>>,
}

impl VoiceIntake {
    /// `model` is `None` when no language-model credential is configured.
    pub fn new(store: Arc<dyn LaunchStore>, model: Option<Arc<dyn CompletionModel>>) -> Self {
        Self { store, model }
    }

    /// Parse `voice_text` with the language model and create a launch.
    ///
    /// Slug uniqueness is not pre-checked here; a taken slug surfaces as the
    /// store's conflict.
    pub async fn parse_and_create_launch(
        &self,
        voice_text: &str,
        user_id: Option<&str>,
    ) -> AppResult<VoiceLaunch> {
        let model = self.model.as_ref().ok_or_else(|| {
            CoreError::Configuration("OpenAI API key not configured".into())
        })?;
        let voice_text = require_text("voice_input", voice_text)?;
        let user_id = user_id.map(str::trim).filter(|u| !u.is_empty());

        tracing::info!(user_id = ?user_id, "Parsing voice request");

        let request = CompletionRequest {
            model: model.default_model().to_string(),
            messages: vec![
                ChatMessage::system(VOICE_SYSTEM_PROMPT),
                ChatMessage::user(voice_text),
            ],
            temperature: VOICE_TEMPERATURE,
            max_tokens: VOICE_MAX_TOKENS,
        };
        let reply = model
            .complete(&request)
            .await
            .map_err(|e| CoreError::ExternalCall {
                service: LLM_SERVICE,
                message: e.to_string(),
            })?;

        let parsed = parse_product_reply(&reply)?;

        let launch = self
            .store
            .create_launch(&CreateLaunch {
                product_name: parsed.product.clone(),
                slug: parsed.slug.clone(),
                description: parsed.description.clone(),
                price: parsed.price,
                prompt: voice_text.to_string(),
                launched_by: Some(user_id.unwrap_or(VOICE_LAUNCHED_BY).to_string()),
            })
            .await?;

        tracing::info!(launch_id = %launch.id, slug = %launch.slug, "Voice launch created");

        self.log_interaction(user_id, voice_text, &parsed).await;

        Ok(VoiceLaunch { launch, parsed })
    }

    /// Record the interaction in the voice audit log. Best-effort.
    async fn log_interaction(&self, user_id: Option<&str>, voice_text: &str, parsed: &ParsedProduct) {
        let response_text = match serde_json::to_string(parsed) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode parsed voice data");
                return;
            }
        };

        let input = CreateVoiceLog {
            user_id: user_id.map(str::to_string),
            message_text: voice_text.to_string(),
            response_text,
        };
        if let Err(e) = self.store.log_voice(&input).await {
            tracing::warn!(error = %e, "Failed to write voice log");
        }
    }
}
