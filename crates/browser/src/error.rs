//! Fetch error types.
//!
//! Display strings for `ChallengeDetected`, `EmptyBody`, and `Parse` are part
//! of the HTTP response contract and must not be reworded casually.

use thiserror::Error;

/// Errors that can occur while fetching chart data through the browser.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("PID is required")]
    EmptyPid,

    #[error("browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("navigation failed: {0}")]
    NavigationFailed(String),

    #[error("couldn't bypass CloudFlare protection")]
    ChallengeDetected,

    #[error("Empty response from API")]
    EmptyBody,

    #[error("Failed to parse API response as JSON")]
    Parse(#[source] serde_json::Error),

    #[error("JavaScript evaluation failed: {0}")]
    JsEvalFailed(String),

    #[error("CDP error: {0}")]
    Cdp(String),
}

impl From<chromiumoxide::error::CdpError> for FetchError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        FetchError::Cdp(err.to_string())
    }
}
