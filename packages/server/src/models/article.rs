use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::article;
use crate::error::AppError;

/// Number of characters of content shown in list previews.
pub const PREVIEW_CHARS: usize = 200;

const UNTITLED: &str = "Untitled";

/// Request body for article generation.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct GenerateRequest {
    /// Link to a YouTube video (`youtube.com/watch?v=...` or `youtu.be/...`).
    #[schema(example = "https://youtu.be/dQw4w9WgXcQ")]
    pub link: String,
}

pub fn validate_generate_request(payload: &GenerateRequest) -> Result<(), AppError> {
    if payload.link.trim().is_empty() {
        return Err(AppError::Validation("Link must not be empty".into()));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct GenerateResponse {
    #[schema(example = true)]
    pub success: bool,
    /// Generated article in Markdown.
    #[schema(example = "# Never Gonna Give You Up\n\n## Introduction\n...")]
    pub content: String,
    /// ID of the stored article.
    #[schema(example = 12)]
    pub id: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ArticleListItem {
    #[schema(example = 12)]
    pub id: i32,
    #[schema(example = "Never Gonna Give You Up")]
    pub title: String,
    /// First 200 characters of the article, `...` appended when cut.
    pub content_preview: String,
    #[schema(example = "https://youtu.be/dQw4w9WgXcQ")]
    pub link: String,
    pub created: DateTime<Utc>,
}

impl From<article::Model> for ArticleListItem {
    fn from(model: article::Model) -> Self {
        Self {
            id: model.id,
            title: derive_title(&model.content),
            content_preview: preview(&model.content),
            link: model.link,
            created: model.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ArticleResponse {
    #[schema(example = 12)]
    pub id: i32,
    #[schema(example = "Never Gonna Give You Up")]
    pub title: String,
    pub content: String,
    #[schema(example = "https://youtu.be/dQw4w9WgXcQ")]
    pub link: String,
    pub created: DateTime<Utc>,
}

impl From<article::Model> for ArticleResponse {
    fn from(model: article::Model) -> Self {
        Self {
            id: model.id,
            title: derive_title(&model.content),
            content: model.content,
            link: model.link,
            created: model.created_at,
        }
    }
}

/// First line of the content with any leading `#` heading marker removed.
pub fn derive_title(content: &str) -> String {
    let first_line = content.trim_start().lines().next().unwrap_or_default();
    let title = first_line.trim_start_matches('#').trim();
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title.to_string()
    }
}

/// Content cut to [`PREVIEW_CHARS`] characters.
pub fn preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}
