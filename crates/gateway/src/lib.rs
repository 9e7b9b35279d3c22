//! HTTP surface for chartrelay: `GET /{pid}` relays upstream chart JSON
//! fetched through the shared headless browser.

pub mod chart;
pub mod server;

pub use server::{AppState, build_app, start_gateway};
