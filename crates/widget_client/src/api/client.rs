//! Chat and cart API client
//!
//! Bearer-authenticated calls against the widget backend. Status
//! classification happens here; the exchange coordinator decides what each
//! class means for the conversation.

use std::sync::Arc;

use log::{error, info};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Response;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use widget_core::{ChatReply, WidgetConfig};

use crate::api::models::{AskRequest, CartAddRequest, CartAddResponse, ErrorBody};
use crate::error::ApiError;

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// Build the shared HTTP client for one widget instance.
///
/// No transient-retry middleware is installed: the widget reacts to the
/// first response it gets and surfaces failures immediately.
pub fn build_http_client() -> Result<ClientWithMiddleware, reqwest::Error> {
    let client = reqwest::Client::builder()
        .default_headers(default_headers())
        .build()?;
    Ok(ClientBuilder::new(client).build())
}

/// Bearer-authenticated API client for the chat and cart endpoints.
pub struct ApiClient {
    client: Arc<ClientWithMiddleware>,
    config: Arc<WidgetConfig>,
}

impl ApiClient {
    pub fn new(client: Arc<ClientWithMiddleware>, config: Arc<WidgetConfig>) -> Self {
        ApiClient { client, config }
    }

    /// Send the conversation snapshot to the chat endpoint.
    pub async fn ask(&self, token: &str, request: &AskRequest) -> Result<ChatReply, ApiError> {
        info!(
            "sending chat request with {} messages",
            request.messages.len()
        );

        let response = self
            .client
            .post(self.config.ask_url())
            .header("Authorization", format!("Bearer {token}"))
            .json(request)
            .send()
            .await?;

        let response = classify(response).await?;
        let reply = response.json::<ChatReply>().await?;
        Ok(reply)
    }

    /// Add a variant to the storefront cart (commerce variant).
    pub async fn add_to_cart(
        &self,
        token: &str,
        request: &CartAddRequest,
    ) -> Result<CartAddResponse, ApiError> {
        info!(
            "cart add: merchandise {} quantity {}",
            request.merchandise_id, request.quantity
        );

        let response = self
            .client
            .post(self.config.cart_add_url())
            .header("Authorization", format!("Bearer {token}"))
            .json(request)
            .send()
            .await?;

        let response = classify(response).await?;
        let body = response.json::<CartAddResponse>().await?;
        Ok(body)
    }
}

/// Map the status-code contract onto the error taxonomy, passing 2xx
/// responses through for body decoding.
async fn classify(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error = match status.as_u16() {
        401 => ApiError::TokenExpired,
        429 => ApiError::RateLimited,
        403 => ApiError::Forbidden,
        code => {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message);
            ApiError::UnexpectedStatus {
                status: code,
                message,
            }
        }
    };
    error!("widget api call failed: {error}");
    Err(error)
}
