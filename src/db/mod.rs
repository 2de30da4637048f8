use uuid::Uuid;

use crate::{error::AppResult, models::WatchlistItem};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryWatchlistStore;
pub use postgres::{create_pool, PgWatchlistStore};

/// Storage for watchlist items
///
/// Every method is a single-record operation. Ownership checks happen in the
/// service layer, not here.
#[async_trait::async_trait]
pub trait WatchlistStore: Send + Sync {
    /// Items owned by `user_id`, newest first
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<WatchlistItem>>;

    /// The item `user_id` saved under `tmdb_id`, if any
    async fn find_by_tmdb_id(
        &self,
        user_id: Uuid,
        tmdb_id: i64,
    ) -> AppResult<Option<WatchlistItem>>;

    async fn get(&self, id: Uuid) -> AppResult<Option<WatchlistItem>>;

    /// Inserts a new item. A duplicate `(user_id, tmdb_id)` fails with `Conflict`.
    async fn insert(&self, item: &WatchlistItem) -> AppResult<()>;

    /// Overwrites the mutable fields of an existing item
    async fn update(&self, item: &WatchlistItem) -> AppResult<()>;

    /// Removes an item, returning whether it existed
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}
