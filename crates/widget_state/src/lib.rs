//! widget_state - Conversation log and lifecycle FSM for the chat widget
//!
//! This crate provides the append-only conversation state and the state
//! machine gating all user interaction with the widget.

pub mod conversation;
pub mod machine;

// Re-export commonly used types
pub use conversation::Conversation;
pub use machine::{LifecycleMachine, StateTransition, WidgetEvent, WidgetState};
