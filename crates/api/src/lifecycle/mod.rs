//! Deployment lifecycle coordination.
//!
//! [`LifecycleController`] starts deployment attempts and applies the
//! workflow engine's completion callbacks. [`VoiceIntake`] turns spoken
//! requests into new launches.

pub mod controller;
pub mod voice;

pub use controller::{CompletionPayload, LifecycleController};
pub use voice::{VoiceIntake, VoiceLaunch};
