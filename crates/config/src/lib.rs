//! Configuration loading and schema for chartrelay.
//!
//! Config file: `chartrelay.toml`, searched in `./` then
//! `~/.config/chartrelay/`. Missing file falls back to defaults.

pub mod loader;
pub mod schema;

pub use {
    loader::{apply_env_overrides, config_dir, discover_and_load, load_config},
    schema::{BrowserConfig, ChartrelayConfig, CorsConfig, ServerConfig, UpstreamConfig},
};
