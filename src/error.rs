/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - auth error / verify error を統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::{AuthError, VerifyError};

/// Body shape for non-auth failures. Matches what the original backend
/// returned from its error handlers, so existing clients keep working.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

/// Body shape for auth failures: `{code, description}` plus the HTTP status.
/// Callers branch on the status code, so auth errors must never be collapsed
/// into the generic shape above (and vice versa).
#[derive(Debug, Serialize)]
pub struct AuthErrorResponse {
    pub code: &'static str,
    pub description: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Auth(err) => {
                let body = AuthErrorResponse {
                    code: err.code(),
                    description: err.to_string(),
                };
                return (err.status(), Json(body)).into_response();
            }
            AppError::BadRequest { message, .. } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { resource } => {
                (StatusCode::NOT_FOUND, format!("{resource} not found"))
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            success: false,
            error: status.as_u16(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<VerifyError> for AppError {
    fn from(e: VerifyError) -> Self {
        match e {
            VerifyError::Auth(err) => AppError::Auth(err),
            // Key-set fetch problems are a server-side configuration issue,
            // not a statement about the caller's token.
            VerifyError::KeySet(err) => {
                tracing::error!(error = %err, "failed to load provider key set");
                AppError::Internal
            }
        }
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => {
                AppError::bad_request("DUPLICATE_TITLE", "a drink with this title already exists")
            }
            RepoError::Db(err) => {
                tracing::error!(error = %err, "database error");
                AppError::Internal
            }
        }
    }
}
