use std::sync::Arc;

use crate::analysis::{TextAnalyzer, TextExtractor};
use crate::config::Config;
use crate::ranking::{JobLocks, JobWeightPropagator, RankManager};
use crate::storage::FileStorage;
use crate::store::ScreeningStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ScreeningStore>,
    /// Where uploaded PDFs live. Local disk or S3, per `STORAGE_BACKEND`.
    pub files: Arc<dyn FileStorage>,
    pub extractor: Arc<dyn TextExtractor>,
    pub analyzer: TextAnalyzer,
    pub ranks: RankManager,
    pub weights: JobWeightPropagator,
    pub config: Config,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ScreeningStore>,
        files: Arc<dyn FileStorage>,
        extractor: Arc<dyn TextExtractor>,
        config: Config,
    ) -> Self {
        let ranks = RankManager::new(store.clone(), JobLocks::default());
        Self {
            analyzer: TextAnalyzer::new(config.experience_policy),
            weights: JobWeightPropagator::new(ranks.clone()),
            ranks,
            store,
            files,
            extractor,
            config,
        }
    }
}
