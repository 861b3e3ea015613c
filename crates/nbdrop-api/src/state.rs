//! Application state shared by all handlers.

use nbdrop_core::Config;
use nbdrop_storage::{LocalStore, Mirror};
use std::sync::Arc;

/// Read-only after startup: request handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: LocalStore,
    /// Best-effort remote copy; a disabled mirror when no credentials exist.
    pub mirror: Arc<dyn Mirror>,
}

impl AppState {
    pub fn new(config: Config, store: LocalStore, mirror: Arc<dyn Mirror>) -> Self {
        Self {
            config,
            store,
            mirror,
        }
    }
}
