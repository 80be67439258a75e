//! Real-time vehicle location tracking service.
//!
//! Composition layer: HTTP routes, the WebSocket viewer registry, and the
//! process-local store implementation. Domain logic lives in `tracking`.

pub mod config;
pub mod http;
pub mod store;
pub mod ws;

pub use config::HttpConfig;
pub use http::{AppState, router};
pub use store::MemoryStore;
