use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{RecommendationRecord, WatchlistEntry},
    services::{completion::CompletionProvider, normalizer, prompt},
};

/// Generates movie recommendations from a user's watchlist
///
/// Builds a prompt from the watchlist titles, sends it to the configured
/// completion provider, and normalizes whatever text comes back into
/// validated records. Nothing is cached or retried.
#[derive(Clone)]
pub struct RecommendationService {
    provider: Arc<dyn CompletionProvider>,
}

impl RecommendationService {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    pub async fn recommend(
        &self,
        watchlist: &[WatchlistEntry],
    ) -> AppResult<Vec<RecommendationRecord>> {
        let prompt = prompt::build_prompt(watchlist)?;

        tracing::info!(
            titles = watchlist.len(),
            provider = self.provider.name(),
            "Requesting recommendations"
        );

        let raw = self.provider.complete(&prompt).await.map_err(|e| {
            tracing::error!(error = %e, provider = self.provider.name(), "Completion failed");
            e
        })?;

        let records = normalizer::normalize(&raw).map_err(|e| {
            tracing::error!(
                kind = %e.kind,
                detail = %e.detail,
                raw_output = %e.raw_output,
                "Failed to normalize completion"
            );
            e
        })?;

        tracing::info!(count = records.len(), "Parsed recommendations");

        Ok(records)
    }
}
