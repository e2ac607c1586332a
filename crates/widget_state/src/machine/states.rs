//! Widget states - Defines the lifecycle states of a widget instance

use serde::{Deserialize, Serialize};

/// Lifecycle states of a widget instance.
///
/// All user interaction is gated on this machine: nothing is wired up
/// before `Ready`, and `AuthFailed` is terminal until the page reloads.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WidgetState {
    /// Configuration validated, nothing started yet.
    Uninitialized,

    /// Initial authentication against the backend is in flight.
    Authenticating,

    /// Authenticated; interaction handlers are wired.
    Ready,

    /// Initial authentication failed. Terminal: the trigger affordance is
    /// disabled and only a page reload leaves this state.
    AuthFailed {
        status: Option<u16>,
        failed_at: String, // ISO timestamp
    },
}

impl Default for WidgetState {
    fn default() -> Self {
        WidgetState::Uninitialized
    }
}

impl WidgetState {
    /// Check if this is a terminal state (no more transitions expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::AuthFailed { .. })
    }

    /// Check if this state allows user input.
    pub fn accepts_user_input(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Get a human-readable description of the current state.
    pub fn description(&self) -> &str {
        match self {
            Self::Uninitialized => "Not initialized",
            Self::Authenticating => "Connecting",
            Self::Ready => "Ready for input",
            Self::AuthFailed { .. } => "Authentication failed",
        }
    }
}
