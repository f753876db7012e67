//! WhatsApp delivery via the Twilio Messages API.
//!
//! Configuration is loaded from environment variables; if the account SID or
//! auth token is missing, [`MessagingConfig::from_env`] returns `None` and no
//! sender should be constructed.

use async_trait::async_trait;
use serde::Deserialize;

use super::{build_client, check_status, DeliveryError};

/// Twilio WhatsApp sandbox sender, used when no number is configured.
const DEFAULT_WHATSAPP_FROM: &str = "whatsapp:+14155238886";

const DEFAULT_API_BASE: &str = "https://api.twilio.com";

// ---------------------------------------------------------------------------
// MessagingConfig
// ---------------------------------------------------------------------------

/// Configuration for the Twilio messaging provider.
#[derive(Debug, Clone)]
pub struct MessagingConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender address, already in `whatsapp:+…` form.
    pub from_number: String,
    /// API origin, overridable for testing against a stub.
    pub api_base: String,
}

impl MessagingConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` unless both the account SID and auth token are set.
    ///
    /// | Variable                 | Required | Default                  |
    /// |--------------------------|----------|--------------------------|
    /// | `TWILIO_ACCOUNT_SID`     | yes      | none                     |
    /// | `TWILIO_AUTH_TOKEN`      | yes      | none                     |
    /// | `TWILIO_WHATSAPP_NUMBER` | no       | `whatsapp:+14155238886`  |
    /// | `TWILIO_API_BASE`        | no       | `https://api.twilio.com` |
    pub fn from_env() -> Option<Self> {
        let account_sid = non_empty_var("TWILIO_ACCOUNT_SID")?;
        let auth_token = non_empty_var("TWILIO_AUTH_TOKEN")?;
        Some(Self {
            account_sid,
            auth_token,
            from_number: non_empty_var("TWILIO_WHATSAPP_NUMBER")
                .unwrap_or_else(|| DEFAULT_WHATSAPP_FROM.to_string()),
            api_base: non_empty_var("TWILIO_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base.trim_end_matches('/'),
            self.account_sid
        )
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Sender seam
// ---------------------------------------------------------------------------

/// A message ready to hand to the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub to: String,
    pub body: String,
}

/// Sends a message through an external provider.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send `message`, returning the provider's message id when it reports
    /// one.
    async fn send(&self, message: &OutboundMessage) -> Result<Option<String>, DeliveryError>;
}

// ---------------------------------------------------------------------------
// TwilioMessenger
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: Option<String>,
}

/// [`MessageSender`] for Twilio WhatsApp.
pub struct TwilioMessenger {
    client: reqwest::Client,
    config: MessagingConfig,
}

impl TwilioMessenger {
    pub fn new(config: MessagingConfig) -> Result<Self, DeliveryError> {
        Ok(Self {
            client: build_client()?,
            config,
        })
    }

    fn request(&self, message: &OutboundMessage) -> reqwest::RequestBuilder {
        let to = whatsapp_address(&message.to);
        let form = [
            ("From", self.config.from_number.as_str()),
            ("To", to.as_str()),
            ("Body", message.body.as_str()),
        ];
        self.client
            .post(self.config.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&form)
    }
}

#[async_trait]
impl MessageSender for TwilioMessenger {
    async fn send(&self, message: &OutboundMessage) -> Result<Option<String>, DeliveryError> {
        let response = check_status(self.request(message).send().await?).await?;
        let sid = response
            .json::<MessageResource>()
            .await
            .ok()
            .and_then(|r| r.sid);
        tracing::debug!(to = %message.to, sid = ?sid, "WhatsApp message sent");
        Ok(sid)
    }
}

/// Prefix a phone number with the WhatsApp channel unless already present.
fn whatsapp_address(phone: &str) -> String {
    if phone.starts_with("whatsapp:") {
        phone.to_string()
    } else {
        format!("whatsapp:{phone}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MessagingConfig {
        MessagingConfig {
            account_sid: "AC123".into(),
            auth_token: "token".into(),
            from_number: DEFAULT_WHATSAPP_FROM.into(),
            api_base: "https://api.twilio.com/".into(),
        }
    }

    #[test]
    fn messages_url_includes_account() {
        assert_eq!(
            config().messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[test]
    fn recipient_gets_whatsapp_prefix_once() {
        assert_eq!(whatsapp_address("+2348012345678"), "whatsapp:+2348012345678");
        assert_eq!(whatsapp_address("whatsapp:+1"), "whatsapp:+1");
    }

    #[test]
    fn request_is_form_encoded_with_basic_auth() {
        let messenger = TwilioMessenger::new(config()).unwrap();
        let request = messenger
            .request(&OutboundMessage {
                to: "+2348012345678".into(),
                body: "hello".into(),
            })
            .build()
            .unwrap();

        assert_eq!(
            request.headers()[reqwest::header::CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
        let auth = request.headers()[reqwest::header::AUTHORIZATION]
            .to_str()
            .unwrap();
        assert!(auth.starts_with("Basic "));

        let body = std::str::from_utf8(request.body().unwrap().as_bytes().unwrap()).unwrap();
        assert!(body.contains("To=whatsapp%3A%2B2348012345678"));
        assert!(body.contains("Body=hello"));
    }
}
