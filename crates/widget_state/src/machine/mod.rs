//! Widget lifecycle state machine

mod events;
mod states;
mod transitions;

pub use events::WidgetEvent;
pub use states::WidgetState;
pub use transitions::{LifecycleMachine, StateTransition};
