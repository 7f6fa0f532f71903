use std::path::Path;
use std::sync::Arc;

use ralph_core::config::{self, Config, LimitsConfig};
use ralph_core::ratelimit::RateLimiter;
use ralph_core::store::PrdStore;
use ralph_provider::{Assembler, OcrEngine, Provider};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PrdStore>,
    pub assembler: Arc<Assembler>,
    pub ocr: Arc<OcrEngine>,
    pub limiter: Arc<RateLimiter>,
    pub limits: LimitsConfig,
}

impl AppState {
    pub fn new(
        store: PrdStore,
        assembler: Assembler,
        ocr: OcrEngine,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            store: Arc::new(store),
            assembler: Arc::new(assembler),
            ocr: Arc::new(ocr),
            limiter: Arc::new(RateLimiter::new()),
            limits,
        }
    }

    /// Build state for a project root from its configuration.
    ///
    /// Fails fast on a missing remote-provider secret or an unopenable
    /// store; both are startup errors, not request errors.
    pub fn from_config(root: &Path, config: &Config) -> anyhow::Result<Self> {
        let store = PrdStore::open(&config::store_path(root))?;
        let provider = Provider::from_config(&config.provider)?;
        let assembler = Assembler::new(provider, config.generation.clone());
        let ocr = OcrEngine::new(&config.ocr);
        Ok(Self::new(store, assembler, ocr, config.limits.clone()))
    }
}
