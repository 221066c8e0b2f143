//! Vigil - rotating batch-analysis server for perpetual futures trend signals.
//!
//! A background loop sweeps the symbol universe in bounded batches, fetches
//! recent k-lines per symbol, scores a trading signal from technical
//! indicators, and publishes the full ordered result set to HTTP and
//! WebSocket viewers after every batch.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;
pub mod websocket;

use config::Config;
use services::ResultCache;
use std::sync::Arc;
use websocket::ClientHub;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cache: Arc<ResultCache>,
    pub hub: Arc<ClientHub>,
}
