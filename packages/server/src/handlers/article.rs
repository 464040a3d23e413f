use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::article::*;
use crate::state::AppState;
use crate::youtube::parse_video_id;

/// Where detail requests for foreign or missing articles are sent.
pub const LIST_LOCATION: &str = "/api/v1/blogs";

#[utoipa::path(
    post,
    path = "/generate",
    tag = "Articles",
    operation_id = "generateArticle",
    summary = "Generate a blog article from a YouTube video",
    description = "Fetches the video's transcript, has the language model write an article from it, stores the article for the current user and returns it. Every call creates a new article, even for a link submitted before.",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Article generated and stored", body = GenerateResponse),
        (status = 400, description = "Bad payload, link or missing transcript (VALIDATION_ERROR, INVALID_URL, TRANSCRIPT_UNAVAILABLE)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 500, description = "Generation or server failure (GENERATION_FAILED, INTERNAL_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = []), ("session" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn generate(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    validate_generate_request(&payload)?;

    let video_id = parse_video_id(&payload.link).ok_or(AppError::InvalidUrl)?;

    let transcript = state
        .transcripts
        .fetch(&video_id, &state.config.transcript.language)
        .await?;
    let text = transcript.text();
    if text.is_empty() {
        return Err(AppError::TranscriptUnavailable(
            "Failed to get transcript: the transcript is empty".into(),
        ));
    }

    let content = state.summarizer.summarize(&text).await?;

    let article = state
        .articles
        .create(auth_user.user_id, &payload.link, &content)
        .await?;

    info!(article_id = article.id, %video_id, "Article generated");

    Ok(Json(GenerateResponse {
        success: true,
        content: article.content,
        id: article.id,
    }))
}

#[utoipa::path(
    get,
    path = "/blogs",
    tag = "Articles",
    operation_id = "listArticles",
    summary = "List the current user's articles",
    description = "Returns every article owned by the current user, newest first, with a derived title and a short content preview.",
    responses(
        (status = 200, description = "Articles of the current user", body = Vec<ArticleListItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = []), ("session" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_articles(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ArticleListItem>>, AppError> {
    let articles = state.articles.list_by_owner(auth_user.user_id).await?;

    Ok(Json(articles.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/blogs/{id}",
    tag = "Articles",
    operation_id = "getArticle",
    summary = "Get one of the current user's articles",
    description = "Returns the full article when the current user owns it. Otherwise redirects to the article list without saying whether the article exists.",
    params(("id" = i32, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Article details", body = ArticleResponse),
        (status = 303, description = "Not owned by the current user; redirect to the article list"),
        (status = 400, description = "Article ID is not a number (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = []), ("session" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn get_article(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Response, AppError> {
    match state.articles.find_by_id(id).await? {
        Some(article) if article.user_id == auth_user.user_id => {
            Ok(Json(ArticleResponse::from(article)).into_response())
        }
        _ => Ok(Redirect::to(LIST_LOCATION).into_response()),
    }
}
