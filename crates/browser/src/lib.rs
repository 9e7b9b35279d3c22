//! Headless Chrome/Chromium fetcher for upstream chart data.
//!
//! The upstream financial-data API sits behind browser-level bot protection,
//! so it cannot be called with a plain HTTP client. This crate drives a
//! shared headless browser via CDP: one process-wide browser, one fresh page
//! per request.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use chartrelay_browser::{BrowserHandle, ChartFetcher, ChartSource};
//!
//! let handle = Arc::new(BrowserHandle::new(Default::default()));
//! let fetcher = ChartFetcher::new(handle, Default::default());
//!
//! let chart = fetcher.fetch_chart("17920").await?;
//! ```

pub mod detect;
pub mod error;
pub mod fetch;
pub mod session;
pub mod types;

pub use {
    error::FetchError,
    fetch::{ChartFetcher, ChartSource},
    session::BrowserHandle,
    types::{BrowserConfig, UpstreamConfig},
};
