//! Shared browser instance, lazily launched with a single-flight guard.
//!
//! The process owns exactly one browser. Requests open their own pages on it
//! and never share them. A failed launch leaves the guard uninitialized, so
//! the next request retries instead of serving the stale failure forever.

use std::time::Duration;

use {
    chromiumoxide::{Browser, BrowserConfig as CdpBrowserConfig, Page},
    futures::StreamExt,
    tokio::sync::{Mutex, OnceCell},
    tracing::{debug, info},
};

use crate::{error::FetchError, types::BrowserConfig};

/// Process-wide headless browser handle.
///
/// Owned by the composition root and shared via `Arc`; there is no global
/// mutable state. `shutdown()` closes the browser on process exit.
pub struct BrowserHandle {
    config: BrowserConfig,
    browser: OnceCell<Mutex<Browser>>,
}

impl Default for BrowserHandle {
    fn default() -> Self {
        Self::new(BrowserConfig::default())
    }
}

impl BrowserHandle {
    /// Create a handle without launching anything yet.
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            config,
            browser: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Launch the browser now instead of on the first request.
    ///
    /// Launch failure here is not fatal: the guard stays empty and the next
    /// `new_page` call retries.
    pub async fn warm_up(&self) -> Result<(), FetchError> {
        self.get().await.map(|_| ())
    }

    /// Open a fresh page on the shared browser, launching it if needed.
    pub async fn new_page(&self) -> Result<Page, FetchError> {
        let browser = self.get().await?;
        let guard = browser.lock().await;
        let page = guard
            .new_page("about:blank")
            .await
            .map_err(|e| FetchError::Cdp(e.to_string()))?;
        debug!("opened new page");
        Ok(page)
    }

    /// Close the browser if it was ever launched.
    pub async fn shutdown(&self) {
        if let Some(browser) = self.browser.get() {
            let mut guard = browser.lock().await;
            if let Err(e) = guard.close().await {
                debug!(error = %e, "browser close failed during shutdown");
            }
            info!("browser shut down");
        }
    }

    /// Whether the browser has been launched.
    pub fn is_running(&self) -> bool {
        self.browser.initialized()
    }

    async fn get(&self) -> Result<&Mutex<Browser>, FetchError> {
        self.browser
            .get_or_try_init(|| async {
                let browser = self.launch().await?;
                Ok(Mutex::new(browser))
            })
            .await
    }

    async fn launch(&self) -> Result<Browser, FetchError> {
        // Pre-check availability so launch failures carry install guidance.
        let detection = crate::detect::detect_browser(self.config.chrome_path.as_deref());
        if !detection.found {
            return Err(FetchError::LaunchFailed(format!(
                "Chrome/Chromium not found. {}",
                detection.install_hint
            )));
        }

        let mut builder = CdpBrowserConfig::builder();

        // chromiumoxide runs headless by default; with_head() disables it.
        if !self.config.headless {
            builder = builder.with_head();
        }

        if let Some(ref path) = self.config.chrome_path {
            builder = builder.chrome_executable(path);
        }

        builder = builder
            .request_timeout(Duration::from_millis(self.config.navigation_timeout_ms))
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox")
            .arg("--hide-scrollbars")
            .arg("--disable-web-security")
            .arg("--ignore-certificate-errors");

        for arg in &self.config.chrome_args {
            builder = builder.arg(arg);
        }

        let cdp_config = builder.build().map_err(|e| {
            FetchError::LaunchFailed(format!("failed to build browser config: {e}"))
        })?;

        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| FetchError::LaunchFailed(e.to_string()))?;

        // Drive CDP events for the lifetime of the browser.
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!(?event, "browser event");
            }
            debug!("browser event handler exited");
        });

        info!(
            headless = self.config.headless,
            navigation_timeout_ms = self.config.navigation_timeout_ms,
            "launched headless browser"
        );

        Ok(browser)
    }
}
