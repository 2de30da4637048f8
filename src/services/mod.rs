pub mod completion;
pub mod normalizer;
pub mod prompt;
pub mod recommendations;
pub mod watchlist;

pub use recommendations::RecommendationService;
