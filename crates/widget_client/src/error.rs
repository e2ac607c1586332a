//! Widget client error taxonomy
//!
//! Maps the backend's status-code contract onto typed errors: 401 token
//! invalid/expired, 429 rate-limited, 403 forbidden, anything else non-2xx a
//! generic failure. Transport and decode failures are wrapped rather than
//! propagated raw so the runtime can match on one enum.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx from the authentication endpoint.
    #[error("authentication failed: {status} - {message}")]
    Auth { status: u16, message: String },

    /// 401 on a chat or cart call: the bearer token is invalid or expired.
    #[error("token invalid or expired")]
    TokenExpired,

    /// 429: the caller should back off.
    #[error("rate limited")]
    RateLimited,

    /// 403: the domain or site is not authorized.
    #[error("forbidden")]
    Forbidden,

    /// Any other non-2xx status.
    #[error("unexpected status {status}")]
    UnexpectedStatus { status: u16, message: Option<String> },

    /// Network-level failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    /// Body read or JSON decode failure.
    #[error("invalid response body: {0}")]
    Decode(#[from] reqwest::Error),
}

impl ApiError {
    /// Whether this error should trigger the bounded re-authentication
    /// retry in the exchange coordinator.
    pub fn is_token_expired(&self) -> bool {
        matches!(self, Self::TokenExpired)
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
