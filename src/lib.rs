pub mod config;
pub mod rest;
pub mod storage;

use std::sync::Arc;

use config::BoardConfig;
use storage::Storage;

/// Shared application state passed to every REST handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<BoardConfig>,
    pub storage: Arc<Storage>,
    pub started_at: std::time::Instant,
}
