use std::sync::Arc;

use crate::config::Config;
use crate::upstream::UpstreamClient;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub upstream: Arc<UpstreamClient>,
}

impl AppState {
    pub fn new(config: Config, upstream: UpstreamClient) -> Self {
        Self {
            config: Arc::new(config),
            upstream: Arc::new(upstream),
        }
    }
}
