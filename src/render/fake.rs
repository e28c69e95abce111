//! In-memory render session for unit tests

use super::{RenderOptions, RenderSession, RenderedPage, SessionLauncher};
use crate::{FetchError, ResourceError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

/// Serves canned HTML per URL and counts every fetch
#[derive(Default)]
pub struct FakeSession {
    pages: HashMap<String, String>,
    failures: HashMap<String, FetchError>,
    fetches: Mutex<HashMap<String, usize>>,
    closes: AtomicUsize,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn with_failure(mut self, url: &str, error: FetchError) -> Self {
        self.failures.insert(url.to_string(), error);
        self
    }

    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .get(url)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().unwrap().values().sum()
    }

    pub fn fetched_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.fetches.lock().unwrap().keys().cloned().collect();
        urls.sort();
        urls
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RenderSession for FakeSession {
    async fn render(&self, url: &Url, _options: &RenderOptions) -> Result<RenderedPage, FetchError> {
        *self
            .fetches
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_insert(0) += 1;

        if let Some(error) = self.failures.get(url.as_str()) {
            return Err(error.clone());
        }

        match self.pages.get(url.as_str()) {
            Some(html) => Ok(RenderedPage {
                final_url: url.clone(),
                status: Some(200),
                html: html.clone(),
            }),
            None => Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: 404,
            }),
        }
    }

    async fn close(&self) -> Result<(), ResourceError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out the same [`FakeSession`] on every launch
pub struct FakeLauncher {
    pub session: Arc<FakeSession>,
    pub launches: AtomicUsize,
}

impl FakeLauncher {
    pub fn new(session: FakeSession) -> Self {
        Self {
            session: Arc::new(session),
            launches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SessionLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Arc<dyn RenderSession>, ResourceError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(self.session.clone())
    }
}
