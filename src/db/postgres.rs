use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use super::WatchlistStore;
use crate::{
    error::{AppError, AppResult},
    models::WatchlistItem,
};

const DUPLICATE_MESSAGE: &str = "Movie already exists in your watchlist";

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse and
/// applies the embedded migrations before returning it.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// PostgreSQL-backed watchlist storage
#[derive(Clone)]
pub struct PgWatchlistStore {
    pool: PgPool,
}

impl PgWatchlistStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, title, description, poster, genre, tmdb_id,
           watched, rating, created_at, updated_at
    FROM watchlist_items
"#;

#[async_trait::async_trait]
impl WatchlistStore for PgWatchlistStore {
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<WatchlistItem>> {
        let query = format!("{} WHERE user_id = $1 ORDER BY created_at DESC", SELECT_COLUMNS);
        let items = sqlx::query_as::<_, WatchlistItem>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn find_by_tmdb_id(
        &self,
        user_id: Uuid,
        tmdb_id: i64,
    ) -> AppResult<Option<WatchlistItem>> {
        let query = format!("{} WHERE user_id = $1 AND tmdb_id = $2", SELECT_COLUMNS);
        let item = sqlx::query_as::<_, WatchlistItem>(&query)
            .bind(user_id)
            .bind(tmdb_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<WatchlistItem>> {
        let query = format!("{} WHERE id = $1", SELECT_COLUMNS);
        let item = sqlx::query_as::<_, WatchlistItem>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    async fn insert(&self, item: &WatchlistItem) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO watchlist_items
                (id, user_id, title, description, poster, genre, tmdb_id,
                 watched, rating, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(item.id)
        .bind(item.user_id)
        .bind(&item.title)
        .bind(&item.description)
        .bind(&item.poster)
        .bind(&item.genre)
        .bind(item.tmdb_id)
        .bind(item.watched)
        .bind(item.rating)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::Conflict(DUPLICATE_MESSAGE.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, item: &WatchlistItem) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE watchlist_items
            SET title = $2, description = $3, poster = $4, genre = $5,
                watched = $6, rating = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(item.id)
        .bind(&item.title)
        .bind(&item.description)
        .bind(&item.poster)
        .bind(&item.genre)
        .bind(item.watched)
        .bind(item.rating)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Movie not found".to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM watchlist_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
