//! Runtime error types

use thiserror::Error;
use widget_client::ApiError;
use widget_core::ConfigError;

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// At most one widget instance may be active per page.
    #[error("a widget instance is already active for {0}")]
    DuplicateInstance(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, WidgetError>;
