//! Rendered page fetching
//!
//! The crawler and the page extractor never talk to a browser directly. They
//! receive an [`Arc<dyn RenderSession>`] that turns a URL into final DOM
//! markup. Sessions are created by a [`SessionLauncher`] and always released
//! through [`with_session`], which closes them on every exit path.
//!
//! Two backends exist:
//! - [`WebDriverLauncher`]: headless Chrome over WebDriver, executes JavaScript
//! - [`HttpLauncher`]: plain HTTP GET, for static sites and tests

mod http;
mod chrome;
mod session;

#[cfg(test)]
pub(crate) mod fake;

pub use self::chrome::{WebDriverLauncher, WebDriverSession};
pub use self::http::{build_http_client, HttpLauncher, HttpSession};
pub use self::session::{with_session, SessionGuard};

use crate::config::{BrowserConfig, RendererBackend};
use crate::{FetchError, ResourceError};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Final state of a rendered page
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// URL after redirects
    pub final_url: Url,
    /// Navigation HTTP status, when the backend can observe it
    pub status: Option<u16>,
    /// Serialized DOM
    pub html: String,
}

impl RenderedPage {
    /// Converts error statuses (>= 400) into a fetch failure
    pub fn ensure_success(self, requested: &Url) -> Result<Self, FetchError> {
        match self.status {
            Some(status) if status >= 400 => Err(FetchError::HttpStatus {
                url: requested.to_string(),
                status,
            }),
            _ => Ok(self),
        }
    }
}

/// Per-navigation options
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Bound on the navigation itself
    pub navigation_timeout: Duration,
    /// CSS selector that must be present before the DOM is read
    pub ready_selector: Option<String>,
    /// Bound on waiting for `ready_selector`
    pub ready_timeout: Duration,
}

impl RenderOptions {
    /// Options used while crawling: no readiness wait
    pub fn for_crawl(config: &BrowserConfig) -> Self {
        Self {
            navigation_timeout: Duration::from_secs(config.navigation_timeout_secs),
            ready_selector: None,
            ready_timeout: Duration::from_secs(config.ready_timeout_secs),
        }
    }

    /// Options used while extracting an article: wait for content
    pub fn for_extraction(config: &BrowserConfig) -> Self {
        Self {
            navigation_timeout: Duration::from_secs(config.extract_navigation_timeout_secs),
            ready_selector: Some(config.ready_selector.clone()),
            ready_timeout: Duration::from_secs(config.ready_timeout_secs),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::for_crawl(&BrowserConfig::default())
    }
}

/// One live rendering session (a browser tab, or an HTTP client)
#[async_trait]
pub trait RenderSession: Send + Sync {
    /// Navigates to `url` and returns the rendered DOM
    async fn render(&self, url: &Url, options: &RenderOptions) -> Result<RenderedPage, FetchError>;

    /// Releases the session; calling it twice is harmless
    async fn close(&self) -> Result<(), ResourceError>;
}

/// Factory for render sessions
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    async fn launch(&self) -> Result<Arc<dyn RenderSession>, ResourceError>;
}

/// Builds the launcher selected by the configuration
pub fn launcher_from_config(config: &BrowserConfig) -> Result<Box<dyn SessionLauncher>, ResourceError> {
    match config.backend {
        RendererBackend::Webdriver => Ok(Box::new(WebDriverLauncher::new(config.clone()))),
        RendererBackend::Http => Ok(Box::new(HttpLauncher::new(&config.user_agent)?)),
    }
}
