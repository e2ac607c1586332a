//! Message exchange coordinator
//!
//! Orchestrates one logical send: auth check, optimistic conversation
//! append, HTTP call, response classification and retry-or-render. The 401
//! retry is an explicit bounded loop with a local attempt accumulator, so
//! the bound holds per logical send no matter how often re-authentication
//! succeeds in between.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, warn};
use tokio::sync::Mutex;
use widget_client::api::models::{AskRequest, CartAddRequest};
use widget_client::{ApiClient, ApiError, AuthSessionManager};
use widget_core::{ChatReply, ChatTurn, Product, WidgetConfig};
use widget_state::Conversation;

use crate::notices;
use crate::renderer::Renderer;

/// Additional authentication attempts allowed per logical send.
const MAX_RETRIES: u32 = 2;

/// Delay before a server-requested follow-up prompt is shown.
const FOLLOW_UP_DELAY_MS: u64 = 400;

pub struct ChatCoordinator {
    config: Arc<WidgetConfig>,
    auth: Arc<AuthSessionManager>,
    api: ApiClient,
    renderer: Arc<dyn Renderer>,
    conversation: Mutex<Conversation>,
    identity: identity_store::Identity,
    page_url: String,
}

impl ChatCoordinator {
    pub fn new(
        config: Arc<WidgetConfig>,
        auth: Arc<AuthSessionManager>,
        api: ApiClient,
        renderer: Arc<dyn Renderer>,
        identity: identity_store::Identity,
        page_url: impl Into<String>,
    ) -> Self {
        let conversation = Conversation::new(config.system_prompt.clone());
        ChatCoordinator {
            config,
            auth,
            api,
            renderer,
            conversation: Mutex::new(conversation),
            identity,
            page_url: page_url.into(),
        }
    }

    /// Send one user message. All outcomes are communicated through the
    /// renderer; nothing is returned and nothing escapes to the host page.
    pub async fn send(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        self.renderer.set_input_enabled(false);
        self.send_bounded(text).await;
        self.renderer.set_input_enabled(true);
        self.renderer.focus_input();
    }

    async fn send_bounded(&self, text: &str) {
        let mut attempts: u32 = 0;

        loop {
            let Some(token) = self.auth.ensure_valid_token().await else {
                self.notice(notices::AUTH_FAILED).await;
                return;
            };

            // Optimistic append: the turn is in flight from here on.
            let messages = {
                let mut conversation = self.conversation.lock().await;
                conversation.append(ChatTurn::user(text));
                conversation.snapshot()
            };
            self.renderer.render_user_message(text);
            self.renderer.clear_input();
            self.renderer.show_typing();

            let request = AskRequest {
                site_id: self.config.site_id.clone(),
                page_url: self.page_url.clone(),
                session_id: self.identity.session_id,
                user_id: self.identity.user_id,
                messages,
            };
            let result = self.api.ask(&token, &request).await;
            self.renderer.hide_typing();

            match result {
                Ok(reply) => {
                    self.render_reply(reply).await;
                    return;
                }
                Err(ApiError::TokenExpired) => {
                    self.auth.invalidate_token().await;
                    if attempts < MAX_RETRIES {
                        attempts += 1;
                        debug!("401 on chat call, retrying (attempt {attempts}/{MAX_RETRIES})");
                        // Compensating rollback so the retry does not
                        // duplicate the user's turn.
                        self.conversation.lock().await.remove_last();
                        self.renderer.remove_last_user_message();
                        self.renderer.restore_input(text);
                        continue;
                    }
                    warn!("401 retries exhausted for this send");
                    self.notice(notices::SESSION_EXPIRED).await;
                    return;
                }
                Err(ApiError::RateLimited) => {
                    self.notice(notices::RATE_LIMITED).await;
                    return;
                }
                Err(ApiError::Forbidden) => {
                    self.notice(notices::ACCESS_DENIED).await;
                    return;
                }
                Err(err) => {
                    error!("chat request failed: {err}");
                    self.notice(notices::GENERIC_FAILURE).await;
                    return;
                }
            }
        }
    }

    async fn render_reply(&self, reply: ChatReply) {
        if reply.is_rich() {
            self.renderer.render_assistant_reply(&reply);
        } else {
            self.renderer.render_assistant_text(notices::DEFAULT_REPLY);
        }

        let content = reply
            .content
            .clone()
            .unwrap_or_else(|| notices::DEFAULT_REPLY.to_string());
        self.conversation
            .lock()
            .await
            .append(ChatTurn::assistant(content));

        if let Some(prompt) = reply.follow_up_prompt() {
            tokio::time::sleep(Duration::from_millis(FOLLOW_UP_DELAY_MS)).await;
            self.renderer.render_assistant_text(prompt);
            self.conversation
                .lock()
                .await
                .append(ChatTurn::assistant(prompt.to_string()));
        }
    }

    /// Render a local status bubble. It enters the outbound history only
    /// when the embedding site opted into mirroring.
    async fn notice(&self, text: &str) {
        self.renderer.render_notice(text);
        if self.config.mirror_local_notices {
            self.conversation
                .lock()
                .await
                .append(ChatTurn::assistant(text));
        }
    }

    /// Show the configured welcome message on first panel open.
    pub async fn show_welcome(&self) {
        self.renderer
            .render_assistant_text(&self.config.welcome_message);
        self.conversation
            .lock()
            .await
            .append(ChatTurn::assistant(self.config.welcome_message.clone()));
    }

    /// Add one unit of a carousel product to the cart.
    pub async fn add_to_cart(&self, product: &Product) {
        if product.id.is_empty() {
            error!("product id missing for cart add: {}", product.title);
            self.notice(notices::PRODUCT_INCOMPLETE).await;
            return;
        }
        self.update_cart(&product.id, 1, &product.title).await;
    }

    /// Mutate the cart by a signed quantity.
    pub async fn update_cart(&self, merchandise_id: &str, quantity: i64, title: &str) {
        let pending = if quantity > 0 {
            notices::CART_ADDING
        } else {
            notices::CART_REMOVING
        };
        self.renderer.render_notice(pending);

        let mut attempts: u32 = 0;
        let request = CartAddRequest {
            merchandise_id: merchandise_id.to_string(),
            quantity,
        };

        loop {
            let Some(token) = self.auth.ensure_valid_token().await else {
                self.renderer.remove_last_notice();
                self.notice(notices::AUTH_FAILED).await;
                return;
            };

            match self.api.add_to_cart(&token, &request).await {
                Ok(result) => {
                    self.renderer.remove_last_notice();
                    self.renderer.render_cart_confirmation(
                        title,
                        quantity > 0,
                        result.checkout_url.as_deref(),
                    );
                    if self.config.mirror_local_notices {
                        let verb = if quantity > 0 { "Added" } else { "Removed" };
                        self.conversation
                            .lock()
                            .await
                            .append(ChatTurn::assistant(format!(
                                "{verb} \"{title}\" {} your cart!",
                                if quantity > 0 { "to" } else { "from" }
                            )));
                    }
                    self.renderer.notify_cart_updated();
                    return;
                }
                Err(ApiError::TokenExpired) => {
                    self.auth.invalidate_token().await;
                    if attempts < MAX_RETRIES {
                        attempts += 1;
                        debug!("401 on cart call, retrying (attempt {attempts}/{MAX_RETRIES})");
                        continue;
                    }
                    self.renderer.remove_last_notice();
                    self.notice(notices::SESSION_EXPIRED).await;
                    return;
                }
                Err(ApiError::UnexpectedStatus {
                    message: Some(message),
                    ..
                }) => {
                    self.renderer.remove_last_notice();
                    self.notice(&message).await;
                    return;
                }
                Err(err) => {
                    error!("cart request failed: {err}");
                    self.renderer.remove_last_notice();
                    self.notice(notices::CART_FAILURE).await;
                    return;
                }
            }
        }
    }

    /// Read-only snapshot of the conversation log.
    pub async fn conversation_snapshot(&self) -> Vec<ChatTurn> {
        self.conversation.lock().await.snapshot()
    }
}
