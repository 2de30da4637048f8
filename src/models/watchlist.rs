use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Highest rating a user may give a movie
pub const MAX_RATING: f64 = 10.0;

/// A movie saved to a user's watchlist
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistItem {
    pub id: Uuid,
    /// Owner of the item
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub poster: String,
    pub genre: Vec<String>,
    /// TMDb catalog identifier
    pub tmdb_id: i64,
    pub watched: bool,
    pub rating: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for adding a movie
///
/// `title` and `tmdb_id` are optional here so a missing value is reported
/// as a validation error instead of a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWatchlistItem {
    pub title: Option<String>,
    pub tmdb_id: Option<i64>,
    pub description: Option<String>,
    pub poster: Option<String>,
    pub genre: Option<Vec<String>>,
}

impl NewWatchlistItem {
    /// Validates the request and builds the item owned by `user_id`
    pub fn into_item(self, user_id: Uuid) -> AppResult<WatchlistItem> {
        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let (Some(title), Some(tmdb_id)) = (title, self.tmdb_id) else {
            return Err(AppError::InvalidInput(
                "Please provide title and TMDb ID".to_string(),
            ));
        };

        let now = Utc::now();
        Ok(WatchlistItem {
            id: Uuid::new_v4(),
            user_id,
            title: title.to_string(),
            description: self.description.unwrap_or_default(),
            poster: self.poster.unwrap_or_default(),
            genre: self.genre.unwrap_or_default(),
            tmdb_id,
            watched: false,
            rating: None,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update for a watchlist item.
///
/// Only the fields listed here can change. Anything else in the request body,
/// including `id`, `user`, `tmdbId` and the timestamps, is ignored.
/// `rating` distinguishes an absent key (`None`) from `null` (`Some(None)`),
/// which clears the rating.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub poster: Option<String>,
    pub genre: Option<Vec<String>>,
    pub watched: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub rating: Option<Option<f64>>,
}

/// Wraps any value that is present in the body, including `null`
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl WatchlistPatch {
    /// Merges the patch into `item`. On error `item` is left untouched.
    pub fn apply(self, item: &mut WatchlistItem) -> AppResult<()> {
        let title = match self.title {
            Some(title) => {
                let trimmed = title.trim();
                if trimmed.is_empty() {
                    return Err(AppError::InvalidInput(
                        "Title cannot be empty".to_string(),
                    ));
                }
                Some(trimmed.to_string())
            }
            None => None,
        };

        if let Some(Some(rating)) = self.rating {
            if !(0.0..=MAX_RATING).contains(&rating) {
                return Err(AppError::InvalidInput(format!(
                    "Rating must be between 0 and {}",
                    MAX_RATING
                )));
            }
        }

        if let Some(title) = title {
            item.title = title;
        }
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(poster) = self.poster {
            item.poster = poster;
        }
        if let Some(genre) = self.genre {
            item.genre = genre;
        }
        if let Some(watched) = self.watched {
            item.watched = watched;
        }
        if let Some(rating) = self.rating {
            item.rating = rating;
        }
        item.updated_at = Utc::now();

        Ok(())
    }
}
