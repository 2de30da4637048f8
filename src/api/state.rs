use std::sync::Arc;

use crate::{
    config::AppEnvironment,
    db::{InMemoryWatchlistStore, WatchlistStore},
    services::{completion::CompletionProvider, RecommendationService},
};

/// Shared application state
///
/// Collaborators are injected at construction; nothing here is a global.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn WatchlistStore>,
    pub recommendations: RecommendationService,
    pub environment: AppEnvironment,
}

impl AppState {
    pub fn new(
        store: Arc<dyn WatchlistStore>,
        provider: Arc<dyn CompletionProvider>,
        environment: AppEnvironment,
    ) -> Self {
        Self {
            store,
            recommendations: RecommendationService::new(provider),
            environment,
        }
    }

    /// State backed by an empty in-memory store
    pub fn in_memory(provider: Arc<dyn CompletionProvider>, environment: AppEnvironment) -> Self {
        Self::new(Arc::new(InMemoryWatchlistStore::new()), provider, environment)
    }
}
