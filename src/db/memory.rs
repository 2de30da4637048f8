use tokio::sync::RwLock;
use uuid::Uuid;

use super::WatchlistStore;
use crate::{
    error::{AppError, AppResult},
    models::WatchlistItem,
};

/// In-process watchlist storage
///
/// Items are kept in insertion order; listing breaks `created_at` ties by
/// putting later inserts first.
#[derive(Default)]
pub struct InMemoryWatchlistStore {
    items: RwLock<Vec<WatchlistItem>>,
}

impl InMemoryWatchlistStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl WatchlistStore for InMemoryWatchlistStore {
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<WatchlistItem>> {
        let items = self.items.read().await;

        // Reverse first so the stable sort keeps later inserts ahead on ties
        let mut owned: Vec<WatchlistItem> = items
            .iter()
            .rev()
            .filter(|item| item.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_by_tmdb_id(
        &self,
        user_id: Uuid,
        tmdb_id: i64,
    ) -> AppResult<Option<WatchlistItem>> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .find(|item| item.user_id == user_id && item.tmdb_id == tmdb_id)
            .cloned())
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<WatchlistItem>> {
        let items = self.items.read().await;
        Ok(items.iter().find(|item| item.id == id).cloned())
    }

    async fn insert(&self, item: &WatchlistItem) -> AppResult<()> {
        let mut items = self.items.write().await;

        // Same constraint as the unique (user_id, tmdb_id) index
        if items
            .iter()
            .any(|existing| existing.user_id == item.user_id && existing.tmdb_id == item.tmdb_id)
        {
            return Err(AppError::Conflict(
                "Movie already exists in your watchlist".to_string(),
            ));
        }
        items.push(item.clone());
        Ok(())
    }

    async fn update(&self, item: &WatchlistItem) -> AppResult<()> {
        let mut items = self.items.write().await;
        let existing = items
            .iter_mut()
            .find(|existing| existing.id == item.id)
            .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;
        *existing = item.clone();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| item.id != id);
        Ok(items.len() < before)
    }
}
