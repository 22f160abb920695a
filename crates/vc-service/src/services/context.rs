//! Service context - dependency container for services
//!
//! Holds the voice store, the clock, and the few settings services read.

use std::sync::Arc;

use vc_common::RankingConfig;
use vc_core::traits::{Clock, SystemClock, VoiceStore};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the dependency container that gets passed to all services.
/// It provides access to:
/// - The voice store (Postgres in production, in-memory in tests)
/// - The clock every accounting timestamp is read from
/// - The process start time used to reconstruct sessions lost in a crash
/// - Ranking limits
#[derive(Clone)]
pub struct ServiceContext {
    store: Arc<dyn VoiceStore>,
    clock: Arc<dyn Clock>,
    startup_time: i64,
    ranking: RankingConfig,
}

impl ServiceContext {
    /// Create a new service context
    pub fn new(
        store: Arc<dyn VoiceStore>,
        clock: Arc<dyn Clock>,
        startup_time: i64,
        ranking: RankingConfig,
    ) -> Self {
        Self {
            store,
            clock,
            startup_time,
            ranking,
        }
    }

    /// Get the voice store
    pub fn store(&self) -> &dyn VoiceStore {
        self.store.as_ref()
    }

    /// Get the clock
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Current time in unix seconds
    #[inline]
    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Unix seconds at which this process started tracking
    #[inline]
    pub fn startup_time(&self) -> i64 {
        self.startup_time
    }

    /// Ranking limits
    pub fn ranking(&self) -> &RankingConfig {
        &self.ranking
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("store", &"VoiceStore")
            .field("startup_time", &self.startup_time)
            .field("ranking", &self.ranking)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    store: Option<Arc<dyn VoiceStore>>,
    clock: Option<Arc<dyn Clock>>,
    startup_time: Option<i64>,
    ranking: Option<RankingConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(mut self, store: Arc<dyn VoiceStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn startup_time(mut self, startup_time: i64) -> Self {
        self.startup_time = Some(startup_time);
        self
    }

    pub fn ranking(mut self, ranking: RankingConfig) -> Self {
        self.ranking = Some(ranking);
        self
    }

    /// Build the ServiceContext
    ///
    /// The clock defaults to the system clock and the startup time to the
    /// clock's current reading.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if the store is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let store = self
            .store
            .ok_or_else(|| ServiceError::validation("store is required"))?;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let startup_time = self.startup_time.unwrap_or_else(|| clock.now());

        Ok(ServiceContext::new(
            store,
            clock,
            startup_time,
            self.ranking.unwrap_or_default(),
        ))
    }
}
