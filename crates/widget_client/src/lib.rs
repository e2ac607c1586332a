//! widget_client - HTTP surface of the chat widget
//!
//! Owns the bearer-token lifecycle (acquisition, expiry tracking, lazy
//! renewal) and the chat/cart API calls. Response statuses are classified
//! into the widget's error taxonomy here; rendering decisions stay with the
//! runtime.

pub mod api;
pub mod auth;
pub mod error;

pub use api::client::{build_http_client, ApiClient};
pub use auth::auth_handler::{AuthPhase, AuthSession, AuthSessionManager};
pub use error::ApiError;
pub use reqwest_middleware::ClientWithMiddleware;
