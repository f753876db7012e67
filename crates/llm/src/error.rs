use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Model returned an empty reply")]
    EmptyReply,
}

impl LlmError {
    /// Map a non-success HTTP status and body to an error.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => LlmError::Authentication(body.to_string()),
            _ => LlmError::Api {
                status,
                message: body.to_string(),
            },
        }
    }
}
