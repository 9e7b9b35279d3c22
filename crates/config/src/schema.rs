//! Config schema types (server, browser, upstream, cors).

use serde::{Deserialize, Serialize};

/// Desktop user agent presented to the upstream provider. The provider's
/// bot protection is noticeably less aggressive towards this UA than
/// towards the headless-Chrome default.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/105.0.0.0 Safari/537.36";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartrelayConfig {
    pub server: ServerConfig,
    pub browser: BrowserConfig,
    pub upstream: UpstreamConfig,
    pub cors: CorsConfig,
}

/// Gateway server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "127.0.0.1".
    pub bind: String,
    /// Port to listen on. Defaults to 3000.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 3000,
        }
    }
}

/// Headless browser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Path to Chrome/Chromium binary (auto-detected if not set).
    pub chrome_path: Option<String>,
    /// Whether to run in headless mode.
    pub headless: bool,
    /// User agent string set on every page.
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
            user_agent: DEFAULT_USER_AGENT.into(),
            navigation_timeout_ms: 30000,
            chrome_args: Vec::new(),
        }
    }
}

/// Upstream chart endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the financial-data API.
    pub base_url: String,
    /// Chart period (ISO-8601 duration).
    pub period: String,
    /// Chart interval (ISO-8601 duration).
    pub interval: String,
    /// Number of data points requested.
    pub pointscount: u32,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.investing.com".into(),
            period: "P1W".into(),
            interval: "P1D".into(),
            pointscount: 60,
        }
    }
}

/// CORS configuration for the HTTP surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to call the API. Fixed allow-list, no wildcard.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost".into(),
                "https://localhost".into(),
                "http://127.0.0.1".into(),
                "https://127.0.0.1".into(),
                "http://macroeconomic.live".into(),
                "https://macroeconomic.live".into(),
                "https://macroeconomic.vercel.app".into(),
            ],
        }
    }
}
