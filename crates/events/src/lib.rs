//! Launchpad outbound deliveries.
//!
//! - [`delivery::workflow`]: triggers the external deployment workflow.
//! - [`delivery::messaging`]: sends operator WhatsApp messages through
//!   Twilio.
//!
//! Both clients sit behind an `async_trait` so the lifecycle controller can be
//! exercised without network access.

pub mod delivery;

pub use delivery::messaging::{MessageSender, MessagingConfig, OutboundMessage, TwilioMessenger};
pub use delivery::workflow::{HttpWorkflowTrigger, WorkflowTrigger, WorkflowTriggerPayload};
pub use delivery::DeliveryError;
