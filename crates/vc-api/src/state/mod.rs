//! Application state
//!
//! Holds the shared state for the Axum application: the service context,
//! configuration, and the voice tracker feeding the accounting engine.

use std::sync::Arc;

use vc_common::AppConfig;
use vc_service::ServiceContext;

use crate::tracker::VoiceTracker;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Service context containing all dependencies
    service_context: Arc<ServiceContext>,
    /// Application configuration
    config: Arc<AppConfig>,
    /// Sharded ingest queue
    tracker: Arc<VoiceTracker>,
}

impl AppState {
    /// Create a new AppState and start the voice tracker workers
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(service_context: ServiceContext, config: AppConfig) -> Self {
        let service_context = Arc::new(service_context);
        let tracker = VoiceTracker::spawn(service_context.clone(), &config.tracker);

        Self {
            service_context,
            config: Arc::new(config),
            tracker: Arc::new(tracker),
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the voice tracker
    pub fn tracker(&self) -> &VoiceTracker {
        &self.tracker
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .field("config", &"AppConfig")
            .field("tracker", &self.tracker)
            .finish()
    }
}
