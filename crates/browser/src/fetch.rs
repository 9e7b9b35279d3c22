//! Chart fetching: navigate, detect the protection challenge, relay JSON.

use std::sync::Arc;

use {
    async_trait::async_trait,
    chromiumoxide::{
        Page,
        cdp::browser_protocol::{
            emulation::SetDeviceMetricsOverrideParams,
            network::SetUserAgentOverrideParams,
        },
    },
    serde_json::Value,
    tracing::{debug, info, warn},
};

use crate::{
    error::FetchError,
    session::BrowserHandle,
    types::UpstreamConfig,
};

/// Body class the provider's bot protection leaves on an unrendered
/// challenge page. Provider-specific and brittle: if the challenge markup
/// changes, detection silently stops working.
const CHALLENGE_BODY_CLASS: &str = "no-js";

/// Source of chart data, keyed by instrument PID.
///
/// The gateway depends on this trait so handlers can be tested with a stub
/// instead of a live browser.
#[async_trait]
pub trait ChartSource: Send + Sync {
    /// Fetch historical chart data for the given PID.
    ///
    /// Returns the upstream JSON verbatim; no schema is imposed.
    async fn fetch_chart(&self, pid: &str) -> Result<Value, FetchError>;
}

/// Fetches chart data by rendering the upstream endpoint in a headless page.
pub struct ChartFetcher {
    handle: Arc<BrowserHandle>,
    upstream: UpstreamConfig,
}

impl ChartFetcher {
    pub fn new(handle: Arc<BrowserHandle>, upstream: UpstreamConfig) -> Self {
        Self { handle, upstream }
    }

    /// Build the upstream chart URL for a PID.
    ///
    /// The PID is embedded verbatim; the original contract does no escaping
    /// beyond requiring it to be non-empty.
    fn chart_url(&self, pid: &str) -> String {
        format!(
            "{}/api/financialdata/{}/historical/chart?period={}&interval={}&pointscount={}",
            self.upstream.base_url,
            pid,
            self.upstream.period,
            self.upstream.interval,
            self.upstream.pointscount
        )
    }

    /// The per-page fetch path. The caller closes the page on every exit.
    async fn fetch_on_page(&self, page: &Page, pid: &str) -> Result<Value, FetchError> {
        let user_agent = SetUserAgentOverrideParams::builder()
            .user_agent(&self.handle.config().user_agent)
            .build()
            .map_err(FetchError::Cdp)?;
        page.set_user_agent(user_agent)
            .await
            .map_err(|e| FetchError::Cdp(e.to_string()))?;

        // Degenerate 1x1 viewport keeps rendering cost minimal; only the
        // body text matters.
        let viewport = SetDeviceMetricsOverrideParams::builder()
            .width(1)
            .height(1)
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(FetchError::Cdp)?;
        page.execute(viewport)
            .await
            .map_err(|e| FetchError::Cdp(e.to_string()))?;

        let url = self.chart_url(pid);
        debug!(pid, url, "navigating to upstream chart endpoint");

        page.goto(&url)
            .await
            .map_err(|e| FetchError::NavigationFailed(e.to_string()))?;
        let _ = page.wait_for_navigation().await;

        let body_class: Option<String> = page
            .evaluate("document.body ? document.body.getAttribute('class') : null")
            .await
            .map_err(|e| FetchError::JsEvalFailed(e.to_string()))?
            .into_value()
            .unwrap_or(None);

        if is_challenge_page(body_class.as_deref()) {
            warn!(pid, "upstream served a bot-protection challenge page");
            return Err(FetchError::ChallengeDetected);
        }

        let body: String = page
            .evaluate("document.body ? document.body.textContent : ''")
            .await
            .map_err(|e| FetchError::JsEvalFailed(e.to_string()))?
            .into_value::<Option<String>>()
            .unwrap_or(None)
            .unwrap_or_default();

        // Log the raw body so parse failures can be diagnosed from the log.
        info!(pid, response = %body, "raw upstream response");

        if body.is_empty() {
            return Err(FetchError::EmptyBody);
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!(pid, error = %e, "failed to parse upstream response as JSON");
            FetchError::Parse(e)
        })
    }
}

#[async_trait]
impl ChartSource for ChartFetcher {
    async fn fetch_chart(&self, pid: &str) -> Result<Value, FetchError> {
        // Reject before any browser work.
        if pid.trim().is_empty() {
            return Err(FetchError::EmptyPid);
        }

        let page = self.handle.new_page().await?;
        let result = self.fetch_on_page(&page, pid).await;

        // The page belongs to this request alone; close it on every path.
        if let Err(e) = page.close().await {
            debug!(pid, error = %e, "page close failed");
        }

        result
    }
}

/// Whether a rendered page is the provider's bot-protection interstitial.
fn is_challenge_page(body_class: Option<&str>) -> bool {
    body_class == Some(CHALLENGE_BODY_CLASS)
}
