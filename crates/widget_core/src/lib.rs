//! widget_core - Shared types for the storefront chat widget
//!
//! Holds the validated widget configuration and the message/product wire
//! model used by every other crate in the workspace.

pub mod config;
pub mod message;

pub use config::{ConfigError, StorefrontMode, WidgetConfig};
pub use message::{ChatReply, ChatRole, ChatTurn, Product};
