//! Browser capability seam for the scraper.
//!
//! The review site gates suspected non-browser clients behind a
//! JavaScript-driven challenge page, so a plain HTTP client only ever sees
//! an opaque "please wait" shell. Extraction therefore runs against a real
//! rendering engine; the [`BrowserEngine`] trait keeps that engine swappable
//! so tests can substitute canned HTML without a browser process.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;

use crate::error::ScrapeError;

/// Interval between checks for the content-ready selector while a challenge
/// resolves.
const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Extra settle time when the ready selector never appears — some pages
/// render real content without any of the expected markers.
const SETTLE_DELAY: Duration = Duration::from_millis(1000);

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// A rendering engine capable of executing page JavaScript.
#[async_trait]
pub trait BrowserEngine: Send + Sync {
    /// Navigates to `url`, waits for the page (and any bot challenge) to
    /// settle, and returns the rendered HTML.
    ///
    /// `ready_selector` is a CSS selector list that signals real content has
    /// replaced the challenge shell.
    async fn fetch_rendered(&self, url: &str, ready_selector: &str)
        -> Result<String, ScrapeError>;
}

/// [`BrowserEngine`] backed by a headless Chromium process via the
/// DevTools protocol.
///
/// One browser process serves all scrapes; each navigation opens a fresh
/// page and closes it when done. The orchestrator's semaphore bounds how
/// many pages are open at once.
pub struct ChromiumBrowser {
    browser: Browser,
    handler_task: tokio::task::JoinHandle<()>,
    page_timeout: Duration,
}

impl std::fmt::Debug for ChromiumBrowser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromiumBrowser")
            .field("page_timeout", &self.page_timeout)
            .finish_non_exhaustive()
    }
}

impl ChromiumBrowser {
    /// Launches the Chromium process and its event-handler task.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Launch`] if the browser binary cannot be
    /// found or started.
    pub async fn launch(headless: bool, page_timeout_ms: u64) -> Result<Self, ScrapeError> {
        let mut builder = BrowserConfig::builder().window_size(1920, 1080);
        if !headless {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|reason| ScrapeError::Launch { reason })?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScrapeError::Launch {
                reason: e.to_string(),
            })?;

        // The handler must be polled for the browser connection to make
        // progress; it ends when the browser process goes away.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        tracing::info!(headless, page_timeout_ms, "browser engine ready");
        Ok(Self {
            browser,
            handler_task,
            page_timeout: Duration::from_millis(page_timeout_ms),
        })
    }

    /// Closes the browser process and stops the event handler.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!(error = %e, "browser did not close cleanly");
        }
        self.handler_task.abort();
    }
}

#[async_trait]
impl BrowserEngine for ChromiumBrowser {
    async fn fetch_rendered(
        &self,
        url: &str,
        ready_selector: &str,
    ) -> Result<String, ScrapeError> {
        let navigate = async {
            let page = self.browser.new_page("about:blank").await.map_err(|e| {
                ScrapeError::Navigation {
                    url: url.to_owned(),
                    reason: e.to_string(),
                }
            })?;
            page.set_user_agent(USER_AGENT)
                .await
                .map_err(|e| ScrapeError::Navigation {
                    url: url.to_owned(),
                    reason: e.to_string(),
                })?;
            page.goto(url).await.map_err(|e| ScrapeError::Navigation {
                url: url.to_owned(),
                reason: e.to_string(),
            })?;
            // DOMContentLoaded-level readiness; challenge resolution comes next.
            page.wait_for_navigation().await.ok();

            // Wait for the anti-bot challenge to resolve: real content
            // appears once the challenge script has run and reloaded.
            let deadline = tokio::time::Instant::now() + self.page_timeout;
            loop {
                if page.find_element(ready_selector).await.is_ok() {
                    break;
                }
                if tokio::time::Instant::now() >= deadline {
                    tokio::time::sleep(SETTLE_DELAY).await;
                    break;
                }
                tokio::time::sleep(READY_POLL_INTERVAL).await;
            }

            let html = page.content().await.map_err(|e| ScrapeError::Navigation {
                url: url.to_owned(),
                reason: e.to_string(),
            })?;
            if let Err(e) = page.close().await {
                tracing::debug!(url, error = %e, "page close failed");
            }
            Ok(html)
        };

        // The outer timeout covers the selector-poll loop and the settle
        // delay, so a stuck navigation can never hang the caller.
        match tokio::time::timeout(self.page_timeout + SETTLE_DELAY + SETTLE_DELAY, navigate).await
        {
            Ok(result) => result,
            Err(_) => Err(ScrapeError::Timeout {
                url: url.to_owned(),
            }),
        }
    }
}
