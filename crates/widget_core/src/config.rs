//! Widget configuration
//!
//! The host page embeds the widget with a set of string attributes. They are
//! read exactly once at load time and validated into a `WidgetConfig`. A
//! missing site identifier is fatal: the widget must not build any state or
//! touch the network without one.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.helloyuno.com";
pub const DEFAULT_WELCOME_MESSAGE: &str = "Hi! How can I help you today?";
pub const DEFAULT_TEASER_MESSAGE: &str = "Let me know if you need help";
pub const DEFAULT_TRIGGER_TEXT: &str = "Ask us";
pub const DEFAULT_TRIGGER_ICON: &str = "💬";
pub const DEFAULT_HEADER_TITLE: &str = "Chat with us";
pub const DEFAULT_PLACEHOLDER: &str = "Type your message…";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a friendly shopping assistant.";
pub const DEFAULT_AUTO_SHOW_DELAY_MS: u64 = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("site_id is required, widget will not load")]
    MissingSiteId,

    #[error("invalid value for attribute {attribute}: {value}")]
    InvalidAttribute { attribute: String, value: String },
}

/// Which chat backend variant the widget talks to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorefrontMode {
    /// Plain chat, `/ask` endpoint, no cart operations.
    Generic,
    /// Commerce variant, `/shopify/ask` endpoint plus cart mutations.
    Shopify,
}

impl Default for StorefrontMode {
    fn default() -> Self {
        Self::Generic
    }
}

impl StorefrontMode {
    /// Path of the chat endpoint for this variant.
    pub fn ask_path(&self) -> &'static str {
        match self {
            Self::Generic => "/ask",
            Self::Shopify => "/shopify/ask",
        }
    }
}

/// Validated widget configuration, read once from the host element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub site_id: String,
    pub api_base: String,
    pub storefront: StorefrontMode,

    // Appearance. The renderer owns how these are applied; the core only
    // carries them through.
    pub theme: String,
    pub position: String,
    pub primary_color: Option<String>,
    pub accent_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,

    // Textual content
    pub welcome_message: String,
    pub teaser_message: String,
    pub trigger_text: String,
    pub trigger_icon: String,
    pub header_title: String,
    pub placeholder: String,
    pub system_prompt: String,

    // Behavior
    pub auto_show: bool,
    pub auto_show_delay_ms: u64,
    pub show_teaser: bool,

    /// Whether locally rendered status notices (rate limit, cart updates)
    /// are mirrored into the conversation history sent to the server.
    #[serde(default)]
    pub mirror_local_notices: bool,
}

fn attr_bool(attrs: &HashMap<String, String>, key: &str) -> bool {
    // Any value other than an explicit "false" keeps the default-on behavior.
    attrs.get(key).map(|v| v.trim() != "false").unwrap_or(true)
}

fn attr_string(attrs: &HashMap<String, String>, key: &str, default: &str) -> String {
    attrs
        .get(key)
        .map(|v| v.to_string())
        .unwrap_or_else(|| default.to_string())
}

impl WidgetConfig {
    /// Build a configuration from the host element's attributes.
    ///
    /// Returns `ConfigError::MissingSiteId` when no site identifier is
    /// present; the caller must abort initialization entirely in that case.
    pub fn from_attributes(attrs: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let site_id = attrs
            .get("site_id")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingSiteId)?;

        let auto_show_delay_ms = match attrs.get("auto_show_delay") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidAttribute {
                    attribute: "auto_show_delay".to_string(),
                    value: raw.clone(),
                })?,
            None => DEFAULT_AUTO_SHOW_DELAY_MS,
        };

        let storefront = match attrs.get("storefront").map(|v| v.trim()) {
            Some("shopify") => StorefrontMode::Shopify,
            Some("generic") | None => StorefrontMode::Generic,
            Some(other) => {
                return Err(ConfigError::InvalidAttribute {
                    attribute: "storefront".to_string(),
                    value: other.to_string(),
                })
            }
        };

        Ok(WidgetConfig {
            site_id,
            api_base: attr_string(attrs, "api_endpoint", DEFAULT_API_BASE),
            storefront,
            theme: attr_string(attrs, "theme", "dark"),
            position: attr_string(attrs, "position", "bottom-right"),
            primary_color: attrs.get("primary_color").cloned(),
            accent_color: attrs.get("accent_color").cloned(),
            background_color: attrs.get("background_color").cloned(),
            text_color: attrs.get("text_color").cloned(),
            welcome_message: attr_string(attrs, "welcome_message", DEFAULT_WELCOME_MESSAGE),
            teaser_message: attr_string(attrs, "teaser_message", DEFAULT_TEASER_MESSAGE),
            trigger_text: attr_string(attrs, "trigger_text", DEFAULT_TRIGGER_TEXT),
            trigger_icon: attr_string(attrs, "trigger_icon", DEFAULT_TRIGGER_ICON),
            header_title: attr_string(attrs, "header_title", DEFAULT_HEADER_TITLE),
            placeholder: attr_string(attrs, "placeholder", DEFAULT_PLACEHOLDER),
            system_prompt: attr_string(attrs, "system_prompt", DEFAULT_SYSTEM_PROMPT),
            auto_show: attr_bool(attrs, "auto_show"),
            auto_show_delay_ms,
            show_teaser: attr_bool(attrs, "show_teaser"),
            mirror_local_notices: attrs
                .get("mirror_local_notices")
                .map(|v| v.trim() == "true")
                .unwrap_or(false),
        })
    }

    /// URL of the chat endpoint for this configuration.
    pub fn ask_url(&self) -> String {
        format!("{}{}", self.api_base, self.storefront.ask_path())
    }

    /// URL of the authentication endpoint.
    pub fn authenticate_url(&self) -> String {
        format!("{}/widget/authenticate", self.api_base)
    }

    /// URL of the cart mutation endpoint (commerce variant).
    pub fn cart_add_url(&self) -> String {
        format!("{}/shopify/cart/add", self.api_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn missing_site_id_is_fatal() {
        let result = WidgetConfig::from_attributes(&attrs(&[("theme", "light")]));
        assert!(matches!(result, Err(ConfigError::MissingSiteId)));
    }

    #[test]
    fn blank_site_id_is_fatal() {
        let result = WidgetConfig::from_attributes(&attrs(&[("site_id", "  ")]));
        assert!(matches!(result, Err(ConfigError::MissingSiteId)));
    }

    #[test]
    fn defaults_apply_when_attributes_absent() {
        let config = WidgetConfig::from_attributes(&attrs(&[("site_id", "site-1")])).unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.theme, "dark");
        assert_eq!(config.position, "bottom-right");
        assert!(config.auto_show);
        assert!(config.show_teaser);
        assert_eq!(config.auto_show_delay_ms, DEFAULT_AUTO_SHOW_DELAY_MS);
        assert_eq!(config.storefront, StorefrontMode::Generic);
        assert!(!config.mirror_local_notices);
    }

    #[test]
    fn explicit_false_disables_boolean_flags() {
        let config = WidgetConfig::from_attributes(&attrs(&[
            ("site_id", "site-1"),
            ("auto_show", "false"),
            ("show_teaser", "false"),
        ]))
        .unwrap();
        assert!(!config.auto_show);
        assert!(!config.show_teaser);
    }

    #[test]
    fn non_false_values_keep_flags_enabled() {
        let config = WidgetConfig::from_attributes(&attrs(&[
            ("site_id", "site-1"),
            ("auto_show", "yes"),
        ]))
        .unwrap();
        assert!(config.auto_show);
    }

    #[test]
    fn invalid_delay_is_rejected() {
        let result = WidgetConfig::from_attributes(&attrs(&[
            ("site_id", "site-1"),
            ("auto_show_delay", "soon"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidAttribute { .. })
        ));
    }

    #[test]
    fn shopify_mode_selects_commerce_endpoint() {
        let config = WidgetConfig::from_attributes(&attrs(&[
            ("site_id", "site-1"),
            ("storefront", "shopify"),
            ("api_endpoint", "https://api.example.com"),
        ]))
        .unwrap();
        assert_eq!(config.ask_url(), "https://api.example.com/shopify/ask");
        assert_eq!(
            config.cart_add_url(),
            "https://api.example.com/shopify/cart/add"
        );
    }

    #[test]
    fn generic_mode_selects_plain_endpoint() {
        let config = WidgetConfig::from_attributes(&attrs(&[("site_id", "site-1")])).unwrap();
        assert!(config.ask_url().ends_with("/ask"));
        assert!(config.authenticate_url().ends_with("/widget/authenticate"));
    }
}
