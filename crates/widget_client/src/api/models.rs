//! Wire payloads for the widget backend

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use widget_core::ChatTurn;

/// Body of `POST /widget/authenticate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticateRequest {
    pub site_id: String,
    pub domain: String,
    /// Single-use nonce, regenerated for every attempt.
    pub nonce: Uuid,
    /// Epoch milliseconds at the time of the request.
    pub timestamp: i64,
}

/// Successful response of `POST /widget/authenticate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticateResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    /// Opaque rate-limit descriptor; stored but not interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limits: Option<serde_json::Value>,
}

/// Error body optionally carried by non-2xx responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /ask` and `POST /shopify/ask`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub site_id: String,
    pub page_url: String,
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub messages: Vec<ChatTurn>,
}

/// Body of `POST /shopify/cart/add`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartAddRequest {
    pub merchandise_id: String,
    pub quantity: i64,
}

/// Successful response of `POST /shopify/cart/add`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartAddResponse {
    #[serde(default)]
    pub checkout_url: Option<String>,
}
