//! Auth session manager
//!
//! Owns the bearer token for one widget instance: acquisition against
//! `/widget/authenticate`, expiry tracking with a one-minute safety buffer,
//! and lazy renewal. There is no background retry; a failed renewal is
//! surfaced to the caller and the next `ensure_valid_token` call tries
//! again from scratch.

use std::sync::Arc;

use chrono::Utc;
use log::{error, info, warn};
use reqwest_middleware::ClientWithMiddleware;
use tokio::sync::Mutex;
use uuid::Uuid;
use widget_core::WidgetConfig;

use crate::api::models::{AuthenticateRequest, AuthenticateResponse, ErrorBody};
use crate::error::ApiError;

/// Safety buffer subtracted from the advertised token lifetime.
const EXPIRY_BUFFER_MS: i64 = 60_000;

/// Phase of the authentication lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Unauthenticated,
    Authenticating,
    Authenticated,
    Failed,
}

/// The one auth session a widget instance owns.
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    pub token: Option<String>,
    pub expires_at_ms: i64,
    pub authenticated: bool,
}

#[derive(Debug, Default)]
struct AuthState {
    session: AuthSession,
    phase: Option<AuthPhase>,
    rate_limits: Option<serde_json::Value>,
}

/// Manages token acquisition, expiry tracking and transparent renewal.
pub struct AuthSessionManager {
    client: Arc<ClientWithMiddleware>,
    config: Arc<WidgetConfig>,
    /// Hostname of the page embedding the widget.
    domain: String,
    state: Mutex<AuthState>,
}

impl AuthSessionManager {
    pub fn new(
        client: Arc<ClientWithMiddleware>,
        config: Arc<WidgetConfig>,
        domain: impl Into<String>,
    ) -> Self {
        AuthSessionManager {
            client,
            config,
            domain: domain.into(),
            state: Mutex::new(AuthState::default()),
        }
    }

    /// Authenticate against the backend and cache the resulting token.
    ///
    /// Sends a fresh single-use nonce and the current timestamp. A non-2xx
    /// status fails with `ApiError::Auth` carrying the status and the
    /// server-provided message when there is one.
    pub async fn authenticate(&self) -> Result<String, ApiError> {
        {
            let mut state = self.state.lock().await;
            state.phase = Some(AuthPhase::Authenticating);
        }

        let request = AuthenticateRequest {
            site_id: self.config.site_id.clone(),
            domain: self.domain.clone(),
            nonce: Uuid::new_v4(),
            timestamp: Utc::now().timestamp_millis(),
        };

        let response = match self
            .client
            .post(self.config.authenticate_url())
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                error!("authentication transport failure: {err}");
                self.state.lock().await.phase = Some(AuthPhase::Failed);
                return Err(ApiError::Transport(err));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| "Unknown error".to_string());
            error!("authentication rejected: {status} - {message}");
            self.state.lock().await.phase = Some(AuthPhase::Failed);
            return Err(ApiError::Auth {
                status: status.as_u16(),
                message,
            });
        }

        let body = match response.json::<AuthenticateResponse>().await {
            Ok(body) => body,
            Err(err) => {
                error!("authentication body decode failure: {err}");
                self.state.lock().await.phase = Some(AuthPhase::Failed);
                return Err(ApiError::Decode(err));
            }
        };

        let expires_at_ms =
            Utc::now().timestamp_millis() + body.expires_in * 1000 - EXPIRY_BUFFER_MS;

        let mut state = self.state.lock().await;
        state.session = AuthSession {
            token: Some(body.token.clone()),
            expires_at_ms,
            authenticated: true,
        };
        state.phase = Some(AuthPhase::Authenticated);
        state.rate_limits = body.rate_limits;

        info!("widget authentication successful");
        Ok(body.token)
    }

    /// Return the cached token while it is still valid, renewing lazily
    /// otherwise. `None` means renewal failed; the caller surfaces the
    /// auth-error state and must not issue the request.
    pub async fn ensure_valid_token(&self) -> Option<String> {
        {
            let state = self.state.lock().await;
            if let Some(token) = &state.session.token {
                if is_token_valid(&state.session, Utc::now().timestamp_millis()) {
                    return Some(token.clone());
                }
            }
        }

        match self.authenticate().await {
            Ok(token) => Some(token),
            Err(err) => {
                warn!("token renewal failed: {err}");
                None
            }
        }
    }

    /// Drop the cached token after a 401. Renewal happens lazily on the
    /// next `ensure_valid_token` call.
    pub async fn invalidate_token(&self) {
        let mut state = self.state.lock().await;
        state.session.token = None;
        state.session.authenticated = false;
        state.phase = Some(AuthPhase::Unauthenticated);
    }

    pub async fn phase(&self) -> AuthPhase {
        let state = self.state.lock().await;
        state.phase.unwrap_or(AuthPhase::Unauthenticated)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.lock().await.session.authenticated
    }

    /// Opaque rate-limit descriptor from the last successful authentication.
    pub async fn rate_limits(&self) -> Option<serde_json::Value> {
        self.state.lock().await.rate_limits.clone()
    }

    #[cfg(test)]
    async fn force_expiry(&self) {
        self.state.lock().await.session.expires_at_ms = 0;
    }
}

fn is_token_valid(session: &AuthSession, now_ms: i64) -> bool {
    session.token.is_some() && session.expires_at_ms > now_ms
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_http_client() -> Arc<ClientWithMiddleware> {
        let client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("client");
        Arc::new(reqwest_middleware::ClientBuilder::new(client).build())
    }

    fn test_config(api_base: &str) -> Arc<WidgetConfig> {
        let mut attrs = HashMap::new();
        attrs.insert("site_id".to_string(), "site-1".to_string());
        attrs.insert("api_endpoint".to_string(), api_base.to_string());
        Arc::new(WidgetConfig::from_attributes(&attrs).expect("config"))
    }

    fn manager(api_base: &str) -> AuthSessionManager {
        AuthSessionManager::new(test_http_client(), test_config(api_base), "shop.example.com")
    }

    fn token_response(token: &str, expires_in: i64) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": token,
            "expires_in": expires_in,
            "rate_limits": {"requests_per_minute": 30}
        }))
    }

    #[test]
    fn token_expiry_buffer() {
        let now = Utc::now().timestamp_millis();
        let valid = AuthSession {
            token: Some("t".to_string()),
            expires_at_ms: now + 120_000,
            authenticated: true,
        };
        let stale = AuthSession {
            token: Some("t".to_string()),
            expires_at_ms: now - 1,
            authenticated: true,
        };
        let missing = AuthSession::default();

        assert!(is_token_valid(&valid, now));
        assert!(!is_token_valid(&stale, now));
        assert!(!is_token_valid(&missing, now));
    }

    #[tokio::test]
    async fn authenticate_stores_token_and_phase() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/widget/authenticate"))
            .and(body_partial_json(serde_json::json!({
                "site_id": "site-1",
                "domain": "shop.example.com"
            })))
            .respond_with(token_response("tok-1", 3600))
            .expect(1)
            .mount(&server)
            .await;

        let manager = manager(&server.uri());
        let token = manager.authenticate().await.expect("auth");

        assert_eq!(token, "tok-1");
        assert_eq!(manager.phase().await, AuthPhase::Authenticated);
        assert!(manager.is_authenticated().await);
        assert!(manager.rate_limits().await.is_some());
    }

    #[tokio::test]
    async fn authenticate_failure_carries_status_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/widget/authenticate"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(serde_json::json!({"message": "domain not allowed"})),
            )
            .mount(&server)
            .await;

        let manager = manager(&server.uri());
        let err = manager.authenticate().await.unwrap_err();

        assert!(matches!(
            err,
            ApiError::Auth { status: 403, ref message } if message == "domain not allowed"
        ));
        assert_eq!(manager.phase().await, AuthPhase::Failed);
    }

    #[tokio::test]
    async fn authenticate_failure_without_body_uses_default_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/widget/authenticate"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let manager = manager(&server.uri());
        let err = manager.authenticate().await.unwrap_err();

        assert!(matches!(
            err,
            ApiError::Auth { status: 500, ref message } if message == "Unknown error"
        ));
    }

    #[tokio::test]
    async fn ensure_valid_token_reuses_cached_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/widget/authenticate"))
            .respond_with(token_response("tok-1", 3600))
            .expect(1)
            .mount(&server)
            .await;

        let manager = manager(&server.uri());
        manager.authenticate().await.expect("auth");

        assert_eq!(manager.ensure_valid_token().await.as_deref(), Some("tok-1"));
        assert_eq!(manager.ensure_valid_token().await.as_deref(), Some("tok-1"));
    }

    #[tokio::test]
    async fn ensure_valid_token_renews_when_expired() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/widget/authenticate"))
            .respond_with(token_response("tok-renewed", 3600))
            .expect(2)
            .mount(&server)
            .await;

        let manager = manager(&server.uri());
        manager.authenticate().await.expect("auth");
        manager.force_expiry().await;

        assert_eq!(
            manager.ensure_valid_token().await.as_deref(),
            Some("tok-renewed")
        );
    }

    #[tokio::test]
    async fn ensure_valid_token_returns_none_on_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/widget/authenticate"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let manager = manager(&server.uri());
        assert!(manager.ensure_valid_token().await.is_none());
        assert_eq!(manager.phase().await, AuthPhase::Failed);
    }

    #[tokio::test]
    async fn invalidate_token_forces_renewal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/widget/authenticate"))
            .respond_with(token_response("tok", 3600))
            .expect(2)
            .mount(&server)
            .await;

        let manager = manager(&server.uri());
        manager.authenticate().await.expect("auth");
        manager.invalidate_token().await;

        assert!(!manager.is_authenticated().await);
        assert_eq!(manager.phase().await, AuthPhase::Unauthenticated);
        assert_eq!(manager.ensure_valid_token().await.as_deref(), Some("tok"));
    }
}
