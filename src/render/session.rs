//! Scoped session lifecycle
//!
//! [`SessionGuard`] owns a session until it is explicitly closed. If the guard
//! is dropped first (early return, cancellation, panic unwinding) it spawns a
//! background close on the runtime captured at construction, since `Drop`
//! cannot await.

use super::{RenderSession, SessionLauncher};
use crate::ResourceError;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;

/// RAII guard that guarantees a render session gets closed
pub struct SessionGuard {
    session: Option<Arc<dyn RenderSession>>,
    runtime_handle: Option<Handle>,
}

impl SessionGuard {
    pub fn new(session: Arc<dyn RenderSession>) -> Self {
        Self {
            session: Some(session),
            runtime_handle: Handle::try_current().ok(),
        }
    }

    /// The guarded session, until the guard is closed
    pub fn session(&self) -> Option<&Arc<dyn RenderSession>> {
        self.session.as_ref()
    }

    /// Closes the session and disarms the guard
    pub async fn close(mut self) -> Result<(), ResourceError> {
        match self.session.take() {
            Some(session) => {
                let result = session.close().await;
                if let Err(ref e) = result {
                    tracing::error!("Error during browser cleanup: {}", e);
                }
                result
            }
            None => Ok(()),
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        match &self.runtime_handle {
            Some(handle) => {
                handle.spawn(async move {
                    if let Err(e) = session.close().await {
                        tracing::warn!("Session cleanup on drop failed: {}", e);
                    } else {
                        tracing::trace!("Session closed on drop");
                    }
                });
            }
            None => tracing::warn!("Session dropped outside a runtime; it was not closed"),
        }
    }
}

/// Runs `f` with a freshly launched session and closes it afterwards
///
/// The session is released on every exit path: normal completion, an error
/// value returned by `f`, cancellation of the returned future, or a panic
/// inside `f`. Only launch and shutdown failures surface as errors.
///
/// # Example
///
/// ```no_run
/// use kb_harvester::config::BrowserConfig;
/// use kb_harvester::render::{with_session, RenderOptions, WebDriverLauncher};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let launcher = WebDriverLauncher::new(BrowserConfig::default());
/// let url = Url::parse("https://interviewing.io/blog")?;
/// let html = with_session(&launcher, |session| async move {
///     session.render(&url, &RenderOptions::default()).await.map(|p| p.html)
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn with_session<F, Fut, T>(launcher: &dyn SessionLauncher, f: F) -> Result<T, ResourceError>
where
    F: FnOnce(Arc<dyn RenderSession>) -> Fut,
    Fut: Future<Output = T>,
{
    let session = launcher.launch().await?;
    let guard = SessionGuard::new(Arc::clone(&session));

    let output = f(session).await;

    guard.close().await?;
    Ok(output)
}
