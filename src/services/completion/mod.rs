//! Text completion abstraction
//!
//! The recommendation pipeline only needs "prompt in, text out". Providers
//! implement [`CompletionProvider`] and are injected into application state,
//! so tests can swap in a canned implementation.

pub mod gemini;

pub use gemini::GeminiProvider;

/// Failure to obtain a completion from the upstream service
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("Completion service unavailable: {0}")]
    Unavailable(String),

    #[error("Completion service timed out")]
    Timeout,
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::Unavailable(e.to_string())
        }
    }
}

/// Trait for text completion providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends `prompt` and returns the full completion text.
    ///
    /// The returned text is untrusted and is expected to go through the
    /// normalizer before anything reads it.
    async fn complete(&self, prompt: &str) -> Result<String, UpstreamError>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
