//! Status enums persisted as lowercase text columns.
//!
//! Each enum's string form matches the `CHECK` constraint on the
//! corresponding column in `db/migrations`.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Return the persisted string form.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $val ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $val => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "Invalid {} '{}'. Must be one of: {:?}",
                        $label,
                        other,
                        [$( $val ),+],
                    ))),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

define_status_enum! {
    /// Launch lifecycle status.
    LaunchStatus ("launch status") {
        Pending = "pending",
        Deploying = "deploying",
        Live = "live",
        Failed = "failed",
    }
}

define_status_enum! {
    /// Status of one deployment attempt.
    DeploymentStatus ("deployment status") {
        Pending = "pending",
        Deploying = "deploying",
        Success = "success",
        Failed = "failed",
    }
}

define_status_enum! {
    /// Status of a workflow execution audit record.
    ExecutionStatus ("execution status") {
        Running = "running",
        Success = "success",
        Failed = "failed",
    }
}

define_status_enum! {
    /// Outbound delivery result of a notification. Unset until a send is attempted.
    DeliveryStatus ("delivery status") {
        Sent = "sent",
        Failed = "failed",
    }
}

impl DeploymentStatus {
    /// Whether the deployment has received its completion callback.
    pub fn is_terminal(self) -> bool {
        matches!(self, DeploymentStatus::Success | DeploymentStatus::Failed)
    }
}
