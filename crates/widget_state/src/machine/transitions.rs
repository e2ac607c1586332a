//! Lifecycle transitions - FSM transition logic
//!
//! Implements the event-driven transitions between widget lifecycle states.

use super::events::WidgetEvent;
use super::states::WidgetState;

/// Represents a state transition result.
#[derive(Debug, Clone)]
pub struct StateTransition {
    /// The state before the transition.
    pub from: WidgetState,
    /// The state after the transition.
    pub to: WidgetState,
    /// The event that triggered the transition.
    pub event: WidgetEvent,
    /// Whether the state actually changed.
    pub changed: bool,
}

/// State machine for the widget lifecycle.
#[derive(Debug, Clone)]
pub struct LifecycleMachine {
    /// Current state.
    current_state: WidgetState,
    /// Transition history (limited).
    history: Vec<StateTransition>,
    /// Max history entries to keep.
    max_history: usize,
}

impl Default for LifecycleMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleMachine {
    /// Create a new machine in the Uninitialized state.
    pub fn new() -> Self {
        Self {
            current_state: WidgetState::Uninitialized,
            history: Vec::new(),
            max_history: 50,
        }
    }

    /// Get the current state.
    pub fn state(&self) -> &WidgetState {
        &self.current_state
    }

    /// Get the transition history.
    pub fn history(&self) -> &[StateTransition] {
        &self.history
    }

    /// Handle an event and transition to a new state.
    pub fn handle_event(&mut self, event: WidgetEvent) -> StateTransition {
        let old_state = self.current_state.clone();
        let new_state = self.compute_next_state(&old_state, &event);
        let changed = old_state != new_state;

        if changed {
            tracing::debug!(from = ?old_state, to = ?new_state, "widget lifecycle transition");
        }

        self.current_state = new_state.clone();

        let transition = StateTransition {
            from: old_state,
            to: new_state,
            event,
            changed,
        };

        self.history.push(transition.clone());
        if self.history.len() > self.max_history {
            self.history.remove(0);
        }

        transition
    }

    /// Compute the next state given current state and event.
    fn compute_next_state(&self, state: &WidgetState, event: &WidgetEvent) -> WidgetState {
        use WidgetEvent::*;
        use WidgetState::*;

        match (state, event) {
            (Uninitialized, AuthStarted) => Authenticating,

            (Authenticating, AuthSucceeded) => Ready,
            (Authenticating, WidgetEvent::AuthFailed { status }) => WidgetState::AuthFailed {
                status: *status,
                failed_at: chrono::Utc::now().to_rfc3339(),
            },

            // AuthFailed is terminal: no automatic retry, only a page reload
            // produces a fresh machine.

            // Interaction events never change the lifecycle state.
            _ => state.clone(),
        }
    }

    /// Check if a transition is valid without executing it.
    pub fn can_transition(&self, event: &WidgetEvent) -> bool {
        let next = self.compute_next_state(&self.current_state, event);
        next != self.current_state
    }
}
