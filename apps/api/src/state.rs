use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::config::Config;
use crate::screening::batch::BatchRunner;
use crate::screening::oracle::ScreeningOracle;
use crate::screening::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable inference seam. Default: LlmScreeningOracle over the Anthropic client.
    pub oracle: Arc<dyn ScreeningOracle>,
    /// Bounds concurrent oracle calls across batch runs, single analyses and duels.
    pub permits: Arc<Semaphore>,
    pub runner: BatchRunner,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config, oracle: Arc<dyn ScreeningOracle>) -> Self {
        let permits = Arc::new(Semaphore::new(config.oracle_concurrency));
        let runner = BatchRunner::new(oracle.clone(), permits.clone());
        Self {
            config,
            oracle,
            permits,
            runner,
            sessions: SessionStore::new(),
        }
    }
}
