//! widget_runtime - Orchestration layer of the chat widget
//!
//! Wires the auth session manager, identity store, conversation state and
//! API client together behind two entry points: the lifecycle controller
//! (initialization, open/close, teaser) and the message-exchange
//! coordinator (send, cart mutations). Presentation is delegated entirely
//! to the `Renderer` collaborator.

pub mod controller;
pub mod coordinator;
pub mod error;
pub mod notices;
pub mod registry;
pub mod renderer;

#[cfg(test)]
pub(crate) mod test_support;

pub use controller::{PageContext, WidgetController};
pub use coordinator::ChatCoordinator;
pub use error::WidgetError;
pub use registry::WidgetRegistry;
pub use renderer::Renderer;
