use crate::{error::AppError, models::WatchlistEntry};

/// Number of recommendations requested from the model
pub const RECOMMENDATION_COUNT: usize = 5;

const TITLE_DELIMITER: &str = ", ";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error("Watchlist is empty")]
    EmptyWatchlist,

    #[error("Watchlist entry {0} has no title")]
    BlankTitle(usize),
}

impl From<PromptError> for AppError {
    fn from(e: PromptError) -> Self {
        AppError::InvalidInput(e.to_string())
    }
}

/// Collapses every whitespace run (newlines included) into one space
fn clean_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Builds the recommendation prompt for a watchlist.
///
/// Titles keep their input order and are joined on one line.
pub fn build_prompt(entries: &[WatchlistEntry]) -> Result<String, PromptError> {
    if entries.is_empty() {
        return Err(PromptError::EmptyWatchlist);
    }

    let titles = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let title = clean_title(&entry.title);
            if title.is_empty() {
                Err(PromptError::BlankTitle(index))
            } else {
                Ok(title)
            }
        })
        .collect::<Result<Vec<_>, _>>()?
        .join(TITLE_DELIMITER);

    Ok(format!(
        "Based on the user's watchlist: {titles},\n\
         recommend {count} similar movies the user might enjoy.\n\
         For each movie, return a JSON object with \"title\", \"genre\", and \"reason\".\n\
         Return only a valid JSON array of exactly {count} objects (no markdown or text outside JSON).",
        titles = titles,
        count = RECOMMENDATION_COUNT,
    ))
}
