//! Headless Chrome backend over WebDriver
//!
//! Connects to a running chromedriver (default `http://localhost:9515`) with
//! `fantoccini`. One session maps to one browser window which is reused for
//! every navigation made through it.

use super::{RenderOptions, RenderSession, RenderedPage, SessionLauncher};
use crate::config::BrowserConfig;
use crate::{FetchError, ResourceError};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;
use webdriver::capabilities::Capabilities;

/// Reads the main document status from the Navigation Timing API
const NAVIGATION_STATUS_SCRIPT: &str = "const nav = performance.getEntriesByType('navigation')[0]; \
     return nav && nav.responseStatus ? nav.responseStatus : null;";

/// Launches [`WebDriverSession`]s
pub struct WebDriverLauncher {
    config: BrowserConfig,
}

impl WebDriverLauncher {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::new();
        let mut chrome_opts = HashMap::new();
        chrome_opts.insert("args".to_string(), json!(chrome_args(&self.config)));
        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));
        caps
    }
}

/// Command line flags passed to Chrome
fn chrome_args(config: &BrowserConfig) -> Vec<String> {
    let mut args = vec![
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        format!("--user-agent={}", config.user_agent),
    ];
    if config.headless {
        args.push("--headless".to_string());
        args.push("--disable-gpu".to_string());
    }
    args
}

#[async_trait]
impl SessionLauncher for WebDriverLauncher {
    async fn launch(&self) -> Result<Arc<dyn RenderSession>, ResourceError> {
        tracing::debug!("Connecting to WebDriver at {}", self.config.webdriver_url);

        let client = ClientBuilder::native()
            .capabilities(self.capabilities())
            .connect(&self.config.webdriver_url)
            .await
            .map_err(|e| {
                ResourceError::Launch(format!("{} ({})", e, self.config.webdriver_url))
            })?;

        tracing::info!("Browser session started");
        Ok(Arc::new(WebDriverSession {
            client,
            closed: AtomicBool::new(false),
        }))
    }
}

/// A live browser window
pub struct WebDriverSession {
    client: Client,
    closed: AtomicBool,
}

impl WebDriverSession {
    async fn navigation_status(&self) -> Option<u16> {
        match self.client.execute(NAVIGATION_STATUS_SCRIPT, vec![]).await {
            Ok(value) => value.as_u64().and_then(|s| u16::try_from(s).ok()),
            Err(e) => {
                tracing::trace!("Navigation status unavailable: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl RenderSession for WebDriverSession {
    async fn render(&self, url: &Url, options: &RenderOptions) -> Result<RenderedPage, FetchError> {
        let navigation = tokio::time::timeout(options.navigation_timeout, self.client.goto(url.as_str()));

        match navigation.await {
            Err(_) => {
                return Err(FetchError::Timeout {
                    url: url.to_string(),
                })
            }
            Ok(Err(e)) => {
                return Err(FetchError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
            Ok(Ok(())) => {}
        }

        if let Some(selector) = &options.ready_selector {
            self.client
                .wait()
                .at_most(options.ready_timeout)
                .for_element(Locator::Css(selector.as_str()))
                .await
                .map_err(|_| FetchError::NotReady {
                    url: url.to_string(),
                    selector: selector.clone(),
                })?;
        }

        let html = self.client.source().await.map_err(|e| FetchError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let final_url = self
            .client
            .current_url()
            .await
            .unwrap_or_else(|_| url.clone());

        let page = RenderedPage {
            final_url,
            status: self.navigation_status().await,
            html,
        };
        page.ensure_success(url)
    }

    async fn close(&self) -> Result<(), ResourceError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.client
            .clone()
            .close()
            .await
            .map_err(|e| ResourceError::Shutdown(e.to_string()))?;
        tracing::info!("Browser session closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chrome_args_headless() {
        let config = BrowserConfig::default();
        let args = chrome_args(&config);
        assert!(args.contains(&"--headless".to_string()));
        assert!(args.iter().any(|a| a.starts_with("--user-agent=Mozilla/5.0")));
    }

    #[test]
    fn test_chrome_args_headed() {
        let config = BrowserConfig {
            headless: false,
            ..BrowserConfig::default()
        };
        let args = chrome_args(&config);
        assert!(!args.contains(&"--headless".to_string()));
        assert!(args.contains(&"--no-sandbox".to_string()));
    }

    #[test]
    fn test_capabilities_carry_chrome_options() {
        let launcher = WebDriverLauncher::new(BrowserConfig::default());
        let caps = launcher.capabilities();
        let args = &caps["goog:chromeOptions"]["args"];
        assert!(args.as_array().is_some_and(|a| !a.is_empty()));
    }

    #[tokio::test]
    async fn test_launch_fails_without_driver() {
        let config = BrowserConfig {
            webdriver_url: "http://127.0.0.1:9".to_string(),
            ..BrowserConfig::default()
        };
        let launcher = WebDriverLauncher::new(config);
        let result = launcher.launch().await;
        assert!(matches!(result, Err(ResourceError::Launch(_))));
    }
}
