//! Runtime configuration types for the browser fetcher.

use serde::{Deserialize, Serialize};

/// Browser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Path to Chrome/Chromium binary (auto-detected if not set).
    pub chrome_path: Option<String>,
    /// Whether to run in headless mode.
    pub headless: bool,
    /// User agent set on every page before navigation.
    pub user_agent: String,
    /// Navigation timeout in milliseconds.
    pub navigation_timeout_ms: u64,
    /// Additional Chrome arguments.
    #[serde(default)]
    pub chrome_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: true,
            user_agent: chartrelay_config::schema::DEFAULT_USER_AGENT.into(),
            navigation_timeout_ms: 30000,
            chrome_args: Vec::new(),
        }
    }
}

impl From<&chartrelay_config::schema::BrowserConfig> for BrowserConfig {
    fn from(cfg: &chartrelay_config::schema::BrowserConfig) -> Self {
        Self {
            chrome_path: cfg.chrome_path.clone(),
            headless: cfg.headless,
            user_agent: cfg.user_agent.clone(),
            navigation_timeout_ms: cfg.navigation_timeout_ms,
            chrome_args: cfg.chrome_args.clone(),
        }
    }
}

/// Upstream chart endpoint parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub period: String,
    pub interval: String,
    pub pointscount: u32,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        let cfg = chartrelay_config::schema::UpstreamConfig::default();
        Self {
            base_url: cfg.base_url,
            period: cfg.period,
            interval: cfg.interval,
            pointscount: cfg.pointscount,
        }
    }
}

impl From<&chartrelay_config::schema::UpstreamConfig> for UpstreamConfig {
    fn from(cfg: &chartrelay_config::schema::UpstreamConfig) -> Self {
        Self {
            base_url: cfg.base_url.clone(),
            period: cfg.period.clone(),
            interval: cfg.interval.clone(),
            pointscount: cfg.pointscount,
        }
    }
}
