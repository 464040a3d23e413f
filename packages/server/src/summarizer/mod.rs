//! Turning transcripts into blog articles with a generative language model.

pub mod gemini;
pub mod prompt;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiSummarizer;
pub use prompt::build_prompt;

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("generation API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("generation API returned no text")]
    EmptyResponse,
}

/// Writes a markdown blog article from raw transcript text.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, transcript: &str) -> Result<String, SummarizeError>;
}
