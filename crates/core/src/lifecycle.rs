//! Launch/deployment lifecycle state machine.
//!
//! ```text
//! pending  --start-->   deploying
//! failed   --start-->   deploying          (retry)
//! deploying --success--> live
//! deploying --failure--> failed
//! live     --success--> live               (replayed callback)
//! failed   --failure--> failed             (replayed callback)
//! ```
//!
//! Every other combination is rejected with [`CoreError::Conflict`], except
//! that [`validate_completion`] lets the latest `deploying` attempt complete a
//! launch still marked `pending`. The functions here are pure; the API layer
//! applies their results to the store.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::status::{DeploymentStatus, ExecutionStatus, LaunchStatus};

/// Terminal result reported by the workflow engine's completion callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentOutcome {
    Success,
    Failed,
}

impl DeploymentOutcome {
    pub fn deployment_status(self) -> DeploymentStatus {
        match self {
            DeploymentOutcome::Success => DeploymentStatus::Success,
            DeploymentOutcome::Failed => DeploymentStatus::Failed,
        }
    }

    pub fn launch_status(self) -> LaunchStatus {
        match self {
            DeploymentOutcome::Success => LaunchStatus::Live,
            DeploymentOutcome::Failed => LaunchStatus::Failed,
        }
    }

    pub fn execution_status(self) -> ExecutionStatus {
        match self {
            DeploymentOutcome::Success => ExecutionStatus::Success,
            DeploymentOutcome::Failed => ExecutionStatus::Failed,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.deployment_status().as_str()
    }
}

/// An event that moves a launch through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A deployment attempt was triggered.
    Start,
    /// The workflow engine reported the attempt's outcome.
    Complete(DeploymentOutcome),
}

/// `deployed` is true exactly when the launch is live.
pub fn is_deployed(status: LaunchStatus) -> bool {
    status == LaunchStatus::Live
}

/// Compute the launch status that `event` leads to from `current`.
pub fn launch_transition(
    current: LaunchStatus,
    event: LifecycleEvent,
) -> Result<LaunchStatus, CoreError> {
    use DeploymentOutcome::{Failed, Success};
    use LifecycleEvent::{Complete, Start};

    match (current, event) {
        (LaunchStatus::Pending | LaunchStatus::Failed, Start) => Ok(LaunchStatus::Deploying),
        (LaunchStatus::Deploying, Start) => Err(CoreError::Conflict(
            "A deployment is already in progress for this launch".into(),
        )),
        (LaunchStatus::Live, Start) => Err(CoreError::Conflict(
            "Launch is already live".into(),
        )),
        (LaunchStatus::Deploying, Complete(outcome)) => Ok(outcome.launch_status()),
        (LaunchStatus::Live, Complete(Success)) => Ok(LaunchStatus::Live),
        (LaunchStatus::Failed, Complete(Failed)) => Ok(LaunchStatus::Failed),
        (LaunchStatus::Live, Complete(Failed)) | (LaunchStatus::Failed, Complete(Success)) => {
            Err(CoreError::Conflict(format!(
                "Cannot transition launch from '{current}' to '{}'",
                invert(current)
            )))
        }
        (LaunchStatus::Pending, Complete(_)) => Err(CoreError::Conflict(
            "Launch has no deployment in progress".into(),
        )),
    }
}

fn invert(status: LaunchStatus) -> LaunchStatus {
    match status {
        LaunchStatus::Live => LaunchStatus::Failed,
        _ => LaunchStatus::Live,
    }
}

/// Compute the deployment status a completion callback leads to.
///
/// A callback identical to the one already applied is accepted so that
/// redelivery is harmless; a contradicting one is rejected.
pub fn deployment_transition(
    current: DeploymentStatus,
    outcome: DeploymentOutcome,
) -> Result<DeploymentStatus, CoreError> {
    let next = outcome.deployment_status();
    match current {
        DeploymentStatus::Deploying => Ok(next),
        terminal if terminal == next => Ok(next),
        DeploymentStatus::Pending => Err(CoreError::Conflict(
            "Deployment has not been started".into(),
        )),
        terminal => Err(CoreError::Conflict(format!(
            "Deployment already completed as '{terminal}', cannot record '{next}'"
        ))),
    }
}

/// Whether a completion callback is being applied for the first time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    First,
    Replay,
}

/// Validate a completion callback against the current launch and deployment.
///
/// `latest` says whether the deployment is the launch's most recent attempt.
/// Callbacks for an older attempt are stale and rejected, as is a replay
/// whose outcome the launch no longer reflects. A first completion of a
/// `deploying` deployment is applied even while the launch is still
/// `pending`, which happens when the start bookkeeping was lost after the
/// workflow engine had already been triggered.
pub fn validate_completion(
    launch: LaunchStatus,
    deployment: DeploymentStatus,
    latest: bool,
    outcome: DeploymentOutcome,
) -> Result<CompletionKind, CoreError> {
    let kind = if deployment.is_terminal() {
        CompletionKind::Replay
    } else {
        CompletionKind::First
    };

    deployment_transition(deployment, outcome)?;

    if !latest {
        return Err(CoreError::Conflict(
            "Stale completion callback: a newer deployment exists for this launch".into(),
        ));
    }

    match kind {
        CompletionKind::First if launch == LaunchStatus::Pending => {}
        CompletionKind::First => {
            launch_transition(launch, LifecycleEvent::Complete(outcome))?;
        }
        CompletionKind::Replay if launch != outcome.launch_status() => {
            return Err(CoreError::Conflict(format!(
                "Stale completion callback: launch is '{launch}'"
            )));
        }
        CompletionKind::Replay => {}
    }

    Ok(kind)
}

/// Field changes applied to a launch when its deployment completes.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchUpdate {
    pub status: LaunchStatus,
    pub deployed: bool,
    /// Set only for a successful deployment that reported a URL.
    pub subdomain_url: Option<String>,
    /// Set whenever the callback carried an error detail.
    pub error_message: Option<String>,
}

/// Build the launch update for a completion callback.
///
/// Blank strings are treated as absent.
pub fn completion_update(
    outcome: DeploymentOutcome,
    deployment_url: Option<&str>,
    error_details: Option<&str>,
) -> LaunchUpdate {
    let status = outcome.launch_status();
    let subdomain_url = match outcome {
        DeploymentOutcome::Success => non_blank(deployment_url),
        DeploymentOutcome::Failed => None,
    };

    LaunchUpdate {
        status,
        deployed: is_deployed(status),
        subdomain_url,
        error_message: non_blank(error_details),
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
