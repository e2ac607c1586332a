//! Widget events - Defines events that trigger lifecycle transitions

use serde::{Deserialize, Serialize};

/// Events that can trigger lifecycle state transitions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WidgetEvent {
    /// Initial authentication request was issued.
    AuthStarted,

    /// Authentication succeeded; the widget may reveal itself.
    AuthSucceeded,

    /// Authentication failed with an HTTP status, or `None` for a
    /// transport-level failure.
    AuthFailed { status: Option<u16> },

    // Interaction events. They do not change the lifecycle state but are
    // recorded in the transition history for diagnostics.
    /// User opened the chat panel.
    PanelOpened,

    /// User closed the chat panel.
    PanelClosed,

    /// User dismissed the teaser affordance.
    TeaserDismissed,
}

impl WidgetEvent {
    /// Check if this event is user-initiated.
    pub fn is_user_event(&self) -> bool {
        matches!(
            self,
            Self::PanelOpened | Self::PanelClosed | Self::TeaserDismissed
        )
    }
}
