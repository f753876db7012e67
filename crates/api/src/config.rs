use launchpad_core::error::CoreError;
use launchpad_events::MessagingConfig;
use launchpad_llm::OpenAiConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// A single `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default   |
    /// |------------------------|-----------|
    /// | `HOST`                 | `0.0.0.0` |
    /// | `PORT`                 | `3000`    |
    /// | `CORS_ORIGINS`         | `*`       |
    /// | `REQUEST_TIMEOUT_SECS` | `30`      |
    pub fn from_env() -> Result<Self, CoreError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = parse_var("PORT", 3000)?;

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse_var("REQUEST_TIMEOUT_SECS", 30)?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
        })
    }

    /// Whether any origin may call the API.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

/// Default workflow-engine endpoint that runs deployments.
pub const DEFAULT_WORKFLOW_WEBHOOK_URL: &str = "https://odia.app.n8n.cloud/webhook/deploy-product";

/// Default workflow identifier recorded on execution rows.
pub const DEFAULT_WORKFLOW_ID: &str = "deploy-product";

/// Default operator address for lifecycle notifications.
pub const DEFAULT_OPERATOR_RECIPIENT: &str = "+2348012345678";

/// Everything the lifecycle controller and voice intake consume.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    pub workflow_webhook_url: String,
    /// Shared secret sent to the workflow engine; omitted when unset.
    pub workflow_webhook_secret: Option<String>,
    pub workflow_id: String,
    pub operator_recipient: String,
    /// `None` disables outbound messaging; notifications are still logged.
    pub messaging: Option<MessagingConfig>,
    /// `None` makes voice intake fail with a configuration error.
    pub openai: Option<OpenAiConfig>,
}

impl LifecycleConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                   | Default                                             |
    /// |---------------------------|-----------------------------------------------------|
    /// | `WORKFLOW_WEBHOOK_URL`    | `https://odia.app.n8n.cloud/webhook/deploy-product` |
    /// | `WORKFLOW_WEBHOOK_SECRET` | none                                                |
    /// | `WORKFLOW_ID`             | `deploy-product`                                    |
    /// | `OPERATOR_RECIPIENT`      | `+2348012345678`                                    |
    ///
    /// Messaging and language-model settings are read by
    /// [`MessagingConfig::from_env`] and [`OpenAiConfig::from_env`].
    pub fn from_env() -> Self {
        Self {
            workflow_webhook_url: var_or("WORKFLOW_WEBHOOK_URL", DEFAULT_WORKFLOW_WEBHOOK_URL),
            workflow_webhook_secret: std::env::var("WORKFLOW_WEBHOOK_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            workflow_id: var_or("WORKFLOW_ID", DEFAULT_WORKFLOW_ID),
            operator_recipient: var_or("OPERATOR_RECIPIENT", DEFAULT_OPERATOR_RECIPIENT),
            messaging: MessagingConfig::from_env(),
            openai: OpenAiConfig::from_env(),
        }
    }
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, CoreError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CoreError::Configuration(format!("{name} must be a number, got '{raw}'"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(origins: &[&str]) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            cors_origins: origins.iter().map(|o| o.to_string()).collect(),
            request_timeout_secs: 30,
        }
    }

    #[test]
    fn wildcard_origin_allows_any() {
        assert!(config(&["*"]).allows_any_origin());
        assert!(config(&[]).allows_any_origin());
        assert!(!config(&["http://localhost:5173"]).allows_any_origin());
    }

    #[test]
    fn unset_numeric_var_uses_default() {
        let value: u64 = parse_var("LAUNCHPAD_TEST_UNSET_NUMERIC_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }
}
