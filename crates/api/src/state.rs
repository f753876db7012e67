use std::sync::Arc;

use launchpad_db::LaunchStore;

use crate::config::ServerConfig;
use crate::lifecycle::{LifecycleController, VoiceIntake};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Launch persistence.
    pub store: Arc<dyn LaunchStore>,
    /// Start/complete deployment coordination.
    pub lifecycle: Arc<LifecycleController>,
    /// Voice-to-launch parsing.
    pub voice: Arc<VoiceIntake>,
}
