pub mod recommendation;
pub mod watchlist;

pub use recommendation::{
    RecommendationRecord, RecommendationRequest, RecommendationResponse, WatchlistEntry,
};
pub use watchlist::{NewWatchlistItem, WatchlistItem, WatchlistPatch};
