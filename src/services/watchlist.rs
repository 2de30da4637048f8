use uuid::Uuid;

use crate::{
    db::WatchlistStore,
    error::{AppError, AppResult},
    models::{NewWatchlistItem, WatchlistItem, WatchlistPatch},
};

/// Lists the user's watchlist, newest first
pub async fn list_items(
    store: &dyn WatchlistStore,
    user_id: Uuid,
) -> AppResult<Vec<WatchlistItem>> {
    store.list_for_user(user_id).await
}

/// Adds a movie to the user's watchlist
///
/// Fails with `Conflict` when the user already saved the same TMDb id.
pub async fn add_item(
    store: &dyn WatchlistStore,
    user_id: Uuid,
    request: NewWatchlistItem,
) -> AppResult<WatchlistItem> {
    let item = request.into_item(user_id)?;

    // Check before writing; the store's unique index still catches races
    if store.find_by_tmdb_id(user_id, item.tmdb_id).await?.is_some() {
        tracing::debug!(user_id = %user_id, tmdb_id = item.tmdb_id, "Duplicate watchlist add");
        return Err(AppError::Conflict(
            "Movie already exists in your watchlist".to_string(),
        ));
    }

    store.insert(&item).await?;

    tracing::info!(
        user_id = %user_id,
        item_id = %item.id,
        tmdb_id = item.tmdb_id,
        "Added movie to watchlist"
    );

    Ok(item)
}

/// Loads an item and checks that `user_id` owns it
async fn load_owned(
    store: &dyn WatchlistStore,
    user_id: Uuid,
    id: Uuid,
) -> AppResult<WatchlistItem> {
    let item = store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    // Existence is reported before ownership
    if item.user_id != user_id {
        tracing::warn!(
            user_id = %user_id,
            owner_id = %item.user_id,
            item_id = %id,
            "Rejected mutation of another user's watchlist item"
        );
        return Err(AppError::Forbidden("Unauthorized".to_string()));
    }

    Ok(item)
}

/// Applies an allow-listed partial update to an item the user owns
pub async fn update_item(
    store: &dyn WatchlistStore,
    user_id: Uuid,
    id: Uuid,
    patch: WatchlistPatch,
) -> AppResult<WatchlistItem> {
    let mut item = load_owned(store, user_id, id).await?;

    // Validation failures leave the stored item untouched
    patch.apply(&mut item)?;
    store.update(&item).await?;

    tracing::info!(user_id = %user_id, item_id = %id, "Updated watchlist item");

    Ok(item)
}

/// Removes an item the user owns
pub async fn delete_item(store: &dyn WatchlistStore, user_id: Uuid, id: Uuid) -> AppResult<()> {
    load_owned(store, user_id, id).await?;

    // Removed concurrently between the load and the delete
    if !store.delete(id).await? {
        return Err(AppError::NotFound("Movie not found".to_string()));
    }

    tracing::info!(user_id = %user_id, item_id = %id, "Removed watchlist item");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryWatchlistStore;

    fn new_item(title: &str, tmdb_id: i64) -> NewWatchlistItem {
        NewWatchlistItem {
            title: Some(title.to_string()),
            tmdb_id: Some(tmdb_id),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_duplicate_add_conflicts_without_write() {
        let store = InMemoryWatchlistStore::new();
        let user = Uuid::new_v4();

        add_item(&store, user, new_item("Heat", 949)).await.unwrap();
        let result = add_item(&store, user, new_item("Heat (1995)", 949)).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        let items = list_items(&store, user).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Heat");
    }

    #[tokio::test]
    async fn test_add_requires_tmdb_id() {
        let store = InMemoryWatchlistStore::new();
        let request = NewWatchlistItem {
            title: Some("Heat".to_string()),
            ..Default::default()
        };
        let result = add_item(&store, Uuid::new_v4(), request).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_non_owner_update_is_forbidden_and_not_applied() {
        let store = InMemoryWatchlistStore::new();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let item = add_item(&store, owner, new_item("Heat", 949)).await.unwrap();

        let patch = WatchlistPatch {
            title: Some("Hijacked".to_string()),
            watched: Some(true),
            ..Default::default()
        };
        let result = update_item(&store, intruder, item.id, patch).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
        let stored = store.get(item.id).await.unwrap().unwrap();
        assert_eq!(stored, item);
    }

    #[tokio::test]
    async fn test_non_owner_delete_is_forbidden() {
        let store = InMemoryWatchlistStore::new();
        let owner = Uuid::new_v4();
        let item = add_item(&store, owner, new_item("Heat", 949)).await.unwrap();

        let result = delete_item(&store, Uuid::new_v4(), item.id).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert!(store.get(item.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_missing_item_is_not_found() {
        let store = InMemoryWatchlistStore::new();
        let user = Uuid::new_v4();

        let update = update_item(&store, user, Uuid::new_v4(), WatchlistPatch::default()).await;
        assert!(matches!(update, Err(AppError::NotFound(_))));

        let delete = delete_item(&store, user, Uuid::new_v4()).await;
        assert!(matches!(delete, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_owner_update_and_delete() {
        let store = InMemoryWatchlistStore::new();
        let owner = Uuid::new_v4();
        let item = add_item(&store, owner, new_item("Heat", 949)).await.unwrap();

        let patch = WatchlistPatch {
            watched: Some(true),
            rating: Some(Some(8.0)),
            ..Default::default()
        };
        let updated = update_item(&store, owner, item.id, patch).await.unwrap();
        assert!(updated.watched);
        assert_eq!(updated.rating, Some(8.0));
        assert_eq!(store.get(item.id).await.unwrap(), Some(updated));

        delete_item(&store, owner, item.id).await.unwrap();
        assert!(list_items(&store, owner).await.unwrap().is_empty());
    }
}
