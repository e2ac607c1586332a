//! Widget lifecycle controller
//!
//! Single entry point per widget instance. Validates configuration, claims
//! the page key in the registry, authenticates before any UI is revealed,
//! and routes user interaction into the coordinator only once the
//! lifecycle machine is in `Ready`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{debug, info, warn};
use tokio::sync::Mutex;
use widget_client::{
    build_http_client, ApiClient, ApiError, AuthSessionManager, ClientWithMiddleware,
};
use widget_core::{Product, StorefrontMode, WidgetConfig};
use widget_state::{LifecycleMachine, WidgetEvent, WidgetState};

use identity_store::{IdentityStorage, IdentityStore};

use crate::coordinator::ChatCoordinator;
use crate::error::WidgetError;
use crate::registry::WidgetRegistry;
use crate::renderer::Renderer;

/// How long the auth-failure banner stays visible.
const AUTH_BANNER_HIDE_MS: u64 = 5000;

/// Where the widget is embedded.
#[derive(Debug, Clone)]
pub struct PageContext {
    /// Full URL of the hosting page, sent with every chat request.
    pub url: String,
    /// Hostname, used for the auth domain check and the instance key.
    pub host: String,
}

pub struct WidgetController {
    config: Arc<WidgetConfig>,
    renderer: Arc<dyn Renderer>,
    registry: Arc<WidgetRegistry>,
    identity_storage: Arc<dyn IdentityStorage>,
    page: PageContext,
    /// One HTTP client per widget instance, shared by the auth manager and
    /// the chat API client.
    client: Arc<ClientWithMiddleware>,
    auth: Arc<AuthSessionManager>,
    machine: Mutex<LifecycleMachine>,
    coordinator: Mutex<Option<Arc<ChatCoordinator>>>,
    first_open: Mutex<bool>,
    /// Set once this instance holds the registry key, so a refused
    /// duplicate never releases the key of the instance that owns it.
    registered: AtomicBool,
}

impl WidgetController {
    /// Validate the host element's attributes and construct a controller.
    ///
    /// A missing site identifier fails here, before any state exists, any
    /// UI is drawn or any network call is made.
    pub fn from_attributes(
        attrs: &HashMap<String, String>,
        renderer: Arc<dyn Renderer>,
        registry: Arc<WidgetRegistry>,
        identity_storage: Arc<dyn IdentityStorage>,
        page: PageContext,
    ) -> Result<Self, WidgetError> {
        let config = Arc::new(WidgetConfig::from_attributes(attrs)?);
        Self::new(config, renderer, registry, identity_storage, page)
    }

    pub fn new(
        config: Arc<WidgetConfig>,
        renderer: Arc<dyn Renderer>,
        registry: Arc<WidgetRegistry>,
        identity_storage: Arc<dyn IdentityStorage>,
        page: PageContext,
    ) -> Result<Self, WidgetError> {
        let client = Arc::new(build_http_client()?);
        let auth = Arc::new(AuthSessionManager::new(
            Arc::clone(&client),
            Arc::clone(&config),
            page.host.clone(),
        ));

        Ok(WidgetController {
            config,
            renderer,
            registry,
            identity_storage,
            page,
            client,
            auth,
            machine: Mutex::new(LifecycleMachine::new()),
            coordinator: Mutex::new(None),
            first_open: Mutex::new(true),
            registered: AtomicBool::new(false),
        })
    }

    /// Run the load sequence: claim the instance key, refresh the persisted
    /// identity, authenticate, then either wire up interaction or enter the
    /// terminal failure state.
    ///
    /// Authentication failure is not an `Err`: it terminates in
    /// `AuthFailed` with the banner shown, and nothing propagates to the
    /// host page. Only a duplicate instance is refused outright.
    pub async fn initialize(self: &Arc<Self>) -> Result<(), WidgetError> {
        self.registry.register(&self.page.host)?;
        self.registered.store(true, Ordering::Release);

        let identity = IdentityStore::new(Arc::clone(&self.identity_storage))
            .get_or_create(Utc::now())
            .await;

        self.machine.lock().await.handle_event(WidgetEvent::AuthStarted);

        match self.auth.authenticate().await {
            Ok(_) => {
                self.machine
                    .lock()
                    .await
                    .handle_event(WidgetEvent::AuthSucceeded);

                let api = ApiClient::new(Arc::clone(&self.client), Arc::clone(&self.config));
                let coordinator = Arc::new(ChatCoordinator::new(
                    Arc::clone(&self.config),
                    Arc::clone(&self.auth),
                    api,
                    Arc::clone(&self.renderer),
                    identity,
                    self.page.url.clone(),
                ));
                *self.coordinator.lock().await = Some(coordinator);

                info!("widget ready for {}", self.page.host);
                self.schedule_teaser_reveal();
                Ok(())
            }
            Err(err) => {
                let status = match &err {
                    ApiError::Auth { status, .. } => Some(*status),
                    _ => None,
                };
                self.machine
                    .lock()
                    .await
                    .handle_event(WidgetEvent::AuthFailed { status });

                warn!("widget not authorized for {}: {err}", self.page.host);
                self.renderer.show_auth_banner();
                let renderer = Arc::clone(&self.renderer);
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(AUTH_BANNER_HIDE_MS)).await;
                    renderer.hide_auth_banner();
                });
                Ok(())
            }
        }
    }

    fn schedule_teaser_reveal(&self) {
        if !(self.config.auto_show && self.config.show_teaser) {
            return;
        }
        let renderer = Arc::clone(&self.renderer);
        let delay = Duration::from_millis(self.config.auto_show_delay_ms);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            renderer.show_teaser();
        });
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> WidgetState {
        self.machine.lock().await.state().clone()
    }

    /// User submitted text from the input affordance.
    pub async fn on_user_submit(&self, text: &str) {
        if !self.state().await.accepts_user_input() {
            debug!("ignoring submit while not ready");
            return;
        }
        if let Some(coordinator) = self.coordinator().await {
            coordinator.send(text).await;
        }
    }

    /// User asked to open the chat panel (trigger or teaser).
    pub async fn on_open_requested(&self) {
        let state = self.state().await;
        if state.is_terminal() {
            // Opening is disabled after a failed load; re-surface the banner.
            self.renderer.show_auth_banner();
            return;
        }
        if !state.accepts_user_input() {
            return;
        }

        self.machine.lock().await.handle_event(WidgetEvent::PanelOpened);

        let mut first_open = self.first_open.lock().await;
        if *first_open {
            *first_open = false;
            drop(first_open);
            if let Some(coordinator) = self.coordinator().await {
                coordinator.show_welcome().await;
            }
        }
        self.renderer.focus_input();
    }

    /// User closed the chat panel.
    pub async fn on_close_requested(&self) {
        self.machine.lock().await.handle_event(WidgetEvent::PanelClosed);
    }

    /// User dismissed the teaser affordance.
    pub async fn on_teaser_dismissed(&self) {
        self.machine
            .lock()
            .await
            .handle_event(WidgetEvent::TeaserDismissed);
    }

    /// User clicked "add to cart" on a carousel product.
    pub async fn on_add_to_cart(&self, product: &Product) {
        if self.config.storefront != StorefrontMode::Shopify {
            warn!("cart mutation requested outside commerce variant");
            return;
        }
        if !self.state().await.accepts_user_input() {
            return;
        }
        if let Some(coordinator) = self.coordinator().await {
            coordinator.add_to_cart(product).await;
        }
    }

    async fn coordinator(&self) -> Option<Arc<ChatCoordinator>> {
        self.coordinator.lock().await.clone()
    }

    /// Conversation snapshot, empty before the widget is ready.
    pub async fn conversation_snapshot(&self) -> Vec<widget_core::ChatTurn> {
        match self.coordinator().await {
            Some(coordinator) => coordinator.conversation_snapshot().await,
            None => Vec::new(),
        }
    }
}

impl Drop for WidgetController {
    fn drop(&mut self) {
        if self.registered.load(Ordering::Acquire) {
            self.registry.release(&self.page.host);
        }
    }
}
