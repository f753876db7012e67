pub mod launch;
pub mod webhooks;
