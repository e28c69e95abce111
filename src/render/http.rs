//! Static HTTP backend
//!
//! Fetches pages with a plain GET and returns the server markup as the DOM.
//! Nothing is executed, so this backend only suits server-rendered sites. The
//! readiness selector is checked once against the received markup.

use super::{RenderOptions, RenderSession, RenderedPage, SessionLauncher};
use crate::{FetchError, ResourceError};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client for page fetches
///
/// # Arguments
///
/// * `user_agent` - The User-Agent header sent with every request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use kb_harvester::render::build_http_client;
///
/// let client = build_http_client("kb-harvester/1.0").unwrap();
/// ```
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Launches [`HttpSession`]s sharing one connection pool
pub struct HttpLauncher {
    client: Client,
}

impl HttpLauncher {
    pub fn new(user_agent: &str) -> Result<Self, ResourceError> {
        let client =
            build_http_client(user_agent).map_err(|e| ResourceError::Launch(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SessionLauncher for HttpLauncher {
    async fn launch(&self) -> Result<Arc<dyn RenderSession>, ResourceError> {
        Ok(Arc::new(HttpSession {
            client: self.client.clone(),
        }))
    }
}

/// Session backed by a reqwest client
pub struct HttpSession {
    client: Client,
}

#[async_trait]
impl RenderSession for HttpSession {
    async fn render(&self, url: &Url, options: &RenderOptions) -> Result<RenderedPage, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .timeout(options.navigation_timeout)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();

        let html = response.text().await.map_err(|e| classify_error(url, e))?;

        let page = RenderedPage {
            final_url,
            status: Some(status),
            html,
        }
        .ensure_success(url)?;

        if let Some(selector) = &options.ready_selector {
            if !has_element(&page.html, selector) {
                return Err(FetchError::NotReady {
                    url: url.to_string(),
                    selector: selector.clone(),
                });
            }
        }

        Ok(page)
    }

    async fn close(&self) -> Result<(), ResourceError> {
        Ok(())
    }
}

fn classify_error(url: &Url, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if e.is_connect() {
        FetchError::Network {
            url: url.to_string(),
            message: "Connection refused".to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

fn has_element(html: &str, selector: &str) -> bool {
    match Selector::parse(selector) {
        Ok(selector) => Html::parse_document(html).select(&selector).next().is_some(),
        Err(_) => {
            tracing::warn!("Ignoring unparseable ready selector: {}", selector);
            true
        }
    }
}
