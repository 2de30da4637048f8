use serde::{Deserialize, Deserializer, Serialize};

/// A movie the user already has, as sent to the recommendation endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WatchlistEntry {
    /// Missing titles deserialize as empty and are rejected by the prompt builder
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub genre: Vec<String>,
}

impl WatchlistEntry {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            genre: Vec::new(),
        }
    }
}

/// Request body for `POST /api/recommendations`
#[derive(Debug, Default, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub watchlist: Vec<WatchlistEntry>,
}

/// Treats an explicit `null` watchlist the same as a missing one
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<WatchlistEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<WatchlistEntry>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single validated recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendationRecord {
    pub title: String,
    pub genre: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<RecommendationRecord>,
}
