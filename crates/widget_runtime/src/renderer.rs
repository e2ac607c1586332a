//! Renderer collaborator contract
//!
//! The core never touches the DOM (or any UI toolkit). Everything visible
//! goes through this trait; a concrete renderer decides layout, styling and
//! device-class behavior.
//!
//! Content contract: all strings handed to a renderer are plain text.
//! Renderers must not interpret them as HTML or any other markup.

use widget_core::ChatReply;

#[cfg_attr(test, mockall::automock)]
pub trait Renderer: Send + Sync {
    /// Show the user's message bubble.
    fn render_user_message(&self, text: &str);

    /// Show a plain-text assistant reply.
    fn render_assistant_text(&self, text: &str);

    /// Show a rich assistant reply (text, product carousel, quick replies).
    fn render_assistant_reply(&self, reply: &ChatReply);

    /// Show a locally produced status bubble (errors, cart progress).
    fn render_notice(&self, text: &str);

    /// Remove the most recently rendered user bubble (401 rollback).
    fn remove_last_user_message(&self);

    /// Remove the most recently rendered notice (pending cart state).
    fn remove_last_notice(&self);

    fn show_typing(&self);
    fn hide_typing(&self);

    /// Gate the input affordance. Disabling it while a request is in
    /// flight is the widget's only mutual-exclusion mechanism.
    fn set_input_enabled(&self, enabled: bool);

    fn clear_input(&self);

    /// Put text back into the input (before a 401 retry).
    fn restore_input(&self, text: &str);

    /// Return focus to the input. Device-class branching (skip on touch
    /// devices) is the renderer's concern.
    fn focus_input(&self);

    /// Show the auth-failure banner and disable the trigger affordance.
    fn show_auth_banner(&self);
    fn hide_auth_banner(&self);

    /// Reveal the teaser affordance.
    fn show_teaser(&self);

    /// Confirm a cart mutation, optionally with a checkout link.
    fn render_cart_confirmation<'a>(&self, title: &str, added: bool, checkout_url: Option<&'a str>);

    /// Let the host storefront react to a cart change.
    fn notify_cart_updated(&self);
}
