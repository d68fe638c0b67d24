//! Application state management

use std::sync::Arc;

use crate::aggregate::Aggregator;
use crate::config::Config;
use crate::content::{PageRenderer, PageSource};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    aggregator: Aggregator,
}

impl AppState {
    /// Create a new application state over a loaded page collection
    pub fn new(
        config: Config,
        source: Arc<dyn PageSource>,
        renderer: Arc<dyn PageRenderer>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                aggregator: Aggregator::new(source, renderer),
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the aggregator
    pub fn aggregator(&self) -> &Aggregator {
        &self.inner.aggregator
    }

    /// Get the page collection
    pub fn pages(&self) -> &dyn PageSource {
        self.inner.aggregator.source()
    }
}
