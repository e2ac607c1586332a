//! Shared fixtures for runtime tests

use std::collections::HashMap;
use std::sync::Mutex;

use widget_core::ChatReply;

use crate::renderer::Renderer;

/// Everything a renderer was asked to do, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    User(String),
    AssistantText(String),
    AssistantReply(Option<String>),
    Notice(String),
    RemoveLastUser,
    RemoveLastNotice,
    ShowTyping,
    HideTyping,
    InputEnabled(bool),
    ClearInput,
    RestoreInput(String),
    FocusInput,
    ShowBanner,
    HideBanner,
    ShowTeaser,
    CartConfirmation {
        title: String,
        added: bool,
        checkout_url: Option<String>,
    },
    CartUpdated,
}

/// Renderer that records every call for later assertions.
#[derive(Default)]
pub struct RecordingRenderer {
    events: Mutex<Vec<RenderEvent>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RenderEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RenderEvent::Notice(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, matcher: impl Fn(&RenderEvent) -> bool) -> usize {
        self.events().iter().filter(|event| matcher(event)).count()
    }

    fn push(&self, event: RenderEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl Renderer for RecordingRenderer {
    fn render_user_message(&self, text: &str) {
        self.push(RenderEvent::User(text.to_string()));
    }

    fn render_assistant_text(&self, text: &str) {
        self.push(RenderEvent::AssistantText(text.to_string()));
    }

    fn render_assistant_reply(&self, reply: &ChatReply) {
        self.push(RenderEvent::AssistantReply(reply.content.clone()));
    }

    fn render_notice(&self, text: &str) {
        self.push(RenderEvent::Notice(text.to_string()));
    }

    fn remove_last_user_message(&self) {
        self.push(RenderEvent::RemoveLastUser);
    }

    fn remove_last_notice(&self) {
        self.push(RenderEvent::RemoveLastNotice);
    }

    fn show_typing(&self) {
        self.push(RenderEvent::ShowTyping);
    }

    fn hide_typing(&self) {
        self.push(RenderEvent::HideTyping);
    }

    fn set_input_enabled(&self, enabled: bool) {
        self.push(RenderEvent::InputEnabled(enabled));
    }

    fn clear_input(&self) {
        self.push(RenderEvent::ClearInput);
    }

    fn restore_input(&self, text: &str) {
        self.push(RenderEvent::RestoreInput(text.to_string()));
    }

    fn focus_input(&self) {
        self.push(RenderEvent::FocusInput);
    }

    fn show_auth_banner(&self) {
        self.push(RenderEvent::ShowBanner);
    }

    fn hide_auth_banner(&self) {
        self.push(RenderEvent::HideBanner);
    }

    fn show_teaser(&self) {
        self.push(RenderEvent::ShowTeaser);
    }

    fn render_cart_confirmation(&self, title: &str, added: bool, checkout_url: Option<&str>) {
        self.push(RenderEvent::CartConfirmation {
            title: title.to_string(),
            added,
            checkout_url: checkout_url.map(|url| url.to_string()),
        });
    }

    fn notify_cart_updated(&self) {
        self.push(RenderEvent::CartUpdated);
    }
}

/// Widget attributes pointing at a mock server.
pub fn test_attrs(api_base: &str, extra: &[(&str, &str)]) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    attrs.insert("site_id".to_string(), "site-1".to_string());
    attrs.insert("api_endpoint".to_string(), api_base.to_string());
    for (key, value) in extra {
        attrs.insert(key.to_string(), value.to_string());
    }
    attrs
}
