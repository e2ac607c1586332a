//! Message and product wire model
//!
//! Shared between the conversation log, the HTTP client and the renderer
//! contract. Field names follow the backend's snake_case wire format.
//!
//! Content contract: `ChatReply::content` is passed to renderers as plain
//! text spans, never as raw HTML. Renderers must not interpret it as markup.

use serde::{Deserialize, Serialize};

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One turn of the conversation log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Server reply to a chat request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_carousel: Option<Vec<Product>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_replies: Option<Vec<String>>,

    #[serde(default)]
    pub follow_up: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_prompt: Option<String>,
}

impl ChatReply {
    /// Whether the reply carries anything renderable.
    ///
    /// A reply with none of content/carousel/quick-replies falls back to a
    /// default textual message.
    pub fn is_rich(&self) -> bool {
        self.content.is_some()
            || self
                .product_carousel
                .as_ref()
                .map(|c| !c.is_empty())
                .unwrap_or(false)
            || self
                .quick_replies
                .as_ref()
                .map(|q| !q.is_empty())
                .unwrap_or(false)
    }

    /// The follow-up prompt, when the server asked for one.
    pub fn follow_up_prompt(&self) -> Option<&str> {
        if self.follow_up {
            self.follow_up_prompt.as_deref()
        } else {
            None
        }
    }
}

fn default_available() -> bool {
    true
}

/// A purchasable product shown in a carousel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub price: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default = "default_available")]
    pub available: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,
}

impl Product {
    /// Resolve the product page URL: explicit `url`, then `product_url`,
    /// then a storefront URL built from the handle.
    pub fn resolve_url(&self, host: &str) -> Option<String> {
        if let Some(url) = &self.url {
            return Some(url.clone());
        }
        if let Some(url) = &self.product_url {
            return Some(url.clone());
        }
        self.handle
            .as_ref()
            .map(|handle| format!("https://{host}/products/{handle}"))
    }
}
