//! Launchpad domain core.
//!
//! Pure, I/O-free building blocks shared by the persistence layer, the
//! outbound delivery clients, and the HTTP service:
//!
//! - [`types`] -- id and timestamp aliases.
//! - [`error`] -- the domain error taxonomy.
//! - [`status`] -- launch, deployment, execution, and delivery statuses.
//! - [`lifecycle`] -- the launch/deployment state machine.
//! - [`naming`] -- URL slug generation.
//! - [`notification`] -- operator message formatting.
//! - [`launch`] -- validation of manually submitted launches.
//! - [`voice`] -- parsing of language-model replies into product data.

pub mod error;
pub mod launch;
pub mod lifecycle;
pub mod naming;
pub mod notification;
pub mod status;
pub mod types;
pub mod voice;
