use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

use crate::summarizer::SummarizeError;
use crate::youtube::TranscriptError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `INVALID_URL`,
    /// `TRANSCRIPT_UNAVAILABLE`, `GENERATION_FAILED`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `PASSWORD_MISMATCH`,
    /// `USERNAME_TAKEN`, `INTERNAL_ERROR`.
    #[schema(example = "INVALID_URL")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Invalid YouTube URL")]
    pub error: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    InvalidUrl,
    /// Captions are disabled or missing in the requested language.
    TranscriptUnavailable(String),
    GenerationFailed,
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    PasswordMismatch,
    UsernameTaken,
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    error: msg,
                },
            ),
            AppError::InvalidUrl => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "INVALID_URL",
                    error: "Invalid YouTube URL".into(),
                },
            ),
            AppError::TranscriptUnavailable(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "TRANSCRIPT_UNAVAILABLE",
                    error: msg,
                },
            ),
            AppError::GenerationFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    code: "GENERATION_FAILED",
                    error: "Failed to generate blog article".into(),
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_MISSING",
                    error: "Authentication required".into(),
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_INVALID",
                    error: "Invalid or expired token".into(),
                },
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "INVALID_CREDENTIALS",
                    error: "Credentials not correct".into(),
                },
            ),
            AppError::PasswordMismatch => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "PASSWORD_MISMATCH",
                    error: "Passwords do not match".into(),
                },
            ),
            AppError::UsernameTaken => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "USERNAME_TAKEN",
                    error: "Username is already taken".into(),
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        error: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<TranscriptError> for AppError {
    fn from(err: TranscriptError) -> Self {
        match err {
            TranscriptError::CaptionsDisabled { ref video_id } => {
                tracing::warn!(%video_id, "Captions disabled");
                AppError::TranscriptUnavailable(
                    "Failed to get transcript: captions are disabled for this video".into(),
                )
            }
            TranscriptError::NotFound {
                ref video_id,
                ref language,
            } => {
                tracing::warn!(%video_id, %language, "No transcript in requested language");
                AppError::TranscriptUnavailable(format!(
                    "Failed to get transcript: no '{language}' transcript is available for this video"
                ))
            }
            other => AppError::Internal(format!("Transcript fetch failed: {other}")),
        }
    }
}

impl From<SummarizeError> for AppError {
    fn from(err: SummarizeError) -> Self {
        tracing::error!("Article generation failed: {err}");
        AppError::GenerationFailed
    }
}
