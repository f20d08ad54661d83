//! API Error Types
//! エラー分類と HTTP レスポンスへのマッピング

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::validation::FieldError;

/// APIエラー分類
///
/// ストア障害の詳細はサーバーログにのみ出し、クライアントには
/// 汎用メッセージを返す
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    /// 認証失敗（トークン欠落・無効・期限切れ）
    #[error("{0}")]
    Auth(String),

    /// ロール不一致
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// 一意キー重複（email など）
    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(anyhow::Error::new(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                warn!("Validation failed: {} field error(s)", errors.len());
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "message": "Validation error", "errors": errors })),
                )
                    .into_response()
            }
            ApiError::BadRequest(message) => error_response(StatusCode::BAD_REQUEST, &message),
            ApiError::Auth(message) => error_response(StatusCode::UNAUTHORIZED, &message),
            ApiError::Forbidden(message) => error_response(StatusCode::FORBIDDEN, &message),
            ApiError::NotFound(message) => error_response(StatusCode::NOT_FOUND, &message),
            ApiError::Conflict(message) => error_response(StatusCode::CONFLICT, &message),
            ApiError::Database(err) => {
                error!("Database error: {}", err);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            ApiError::Internal(err) => {
                error!("Internal error: {:#}", err);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }
}

/// エラーレスポンス生成
fn error_response(status: StatusCode, message: &str) -> Response {
    warn!("API Error: {} {}", status.as_u16(), message);
    (status, Json(json!({ "message": message }))).into_response()
}
